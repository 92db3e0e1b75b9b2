//! Rendering of copy progress events.

use std::cell::{Cell, RefCell};
use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use dvdmirror_core::CopyProgress;
use dvdmirror_core::progress::blocks_to_mib;

/// Turns [`CopyProgress`] events into a progress bar, or into percentage
/// log lines when stdout is not a terminal.
pub(crate) struct ProgressDisplay {
    quiet: bool,
    /// Whether `Advanced` events will arrive at all.
    enabled: bool,
    interactive: bool,
    bar: RefCell<Option<ProgressBar>>,
    /// Last logged tenth, for non-interactive output.
    last_step: Cell<u64>,
}

impl ProgressDisplay {
    pub(crate) fn new(quiet: bool, enabled: bool) -> Self {
        Self {
            quiet,
            enabled,
            interactive: std::io::stdout().is_terminal(),
            bar: RefCell::new(None),
            last_step: Cell::new(0),
        }
    }

    pub(crate) fn handle(&self, event: CopyProgress) {
        match event {
            CopyProgress::Started {
                file,
                label,
                total_blocks,
            } => {
                self.clear();
                self.last_step.set(0);
                log::debug!(
                    "Copying {} ({}, {:.1} MiB)",
                    file,
                    label,
                    blocks_to_mib(total_blocks)
                );
                if self.enabled && self.interactive {
                    *self.bar.borrow_mut() = Some(self.new_bar(&file, &label, total_blocks));
                }
            }
            CopyProgress::Advanced {
                done_blocks,
                total_blocks,
            } => {
                if let Some(bar) = self.bar.borrow().as_ref() {
                    bar.set_length(total_blocks);
                    bar.set_position(done_blocks);
                    return;
                }
                if self.quiet || total_blocks == 0 {
                    return;
                }
                let step = done_blocks * 10 / total_blocks;
                if step > self.last_step.get() {
                    self.last_step.set(step);
                    log::info!(
                        "  {:>3}% ({:.1} of {:.1} MiB)",
                        step * 10,
                        blocks_to_mib(done_blocks),
                        blocks_to_mib(total_blocks)
                    );
                }
            }
            CopyProgress::Padded { block, count, .. } => {
                if let Some(bar) = self.bar.borrow().as_ref() {
                    bar.set_message(format!("padded {} at {}", count, block));
                }
            }
            CopyProgress::Finished { .. } => self.clear(),
        }
    }

    fn new_bar(&self, file: &str, label: &str, total_blocks: u64) -> ProgressBar {
        let bar = if self.quiet {
            ProgressBar::with_draw_target(Some(total_blocks), ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new(total_blocks)
        };
        bar.set_style(
            ProgressStyle::with_template(
                "  {prefix:.cyan} [{bar:30}] {percent:>3}% {elapsed_precise} {msg}",
            )
            .expect("static pattern")
            .progress_chars("=> "),
        );
        bar.set_prefix(format!("{} ({})", file, label));
        bar
    }

    fn clear(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
