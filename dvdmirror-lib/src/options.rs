use dvdmirror_core::{AspectRatio, ErrorStrategy, GapFill};

/// Options threaded through every mirroring operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOptions {
    /// What to do on unreadable blocks.
    pub strategy: ErrorStrategy,
    /// Aspect ratio that wins a tie between the two halves of a dual disc.
    pub preferred_aspect: AspectRatio,
    /// How unreferenced gaps are written under `SkipUnreferenced`.
    pub gap_fill: GapFill,
    /// Emit `CopyProgress::Advanced` updates while copying.
    pub progress: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            strategy: ErrorStrategy::default(),
            preferred_aspect: AspectRatio::Widescreen,
            gap_fill: GapFill::default(),
            progress: false,
        }
    }
}

impl MirrorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn preferred_aspect(mut self, aspect: AspectRatio) -> Self {
        self.preferred_aspect = aspect;
        self
    }

    pub fn gap_fill(mut self, gap_fill: GapFill) -> Self {
        self.gap_fill = gap_fill;
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}
