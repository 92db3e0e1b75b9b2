//! Main feature guessing.
//!
//! Ranks title sets by chapters, audio streams, subpicture streams, audio
//! channels and title VOB size, then walks a fixed sequence of acceptance
//! rules. The largest title set is the answer of last resort, so the guess is
//! always a valid title set.

use std::fmt;

use dvdmirror_core::AspectRatio;

use crate::catalog::{TitleCatalog, TitleRecord, TitleSetCatalog, TitleSetFeatures};

/// `found_chapter` value when the first guess is not among the top chapter
/// ranks.
pub const CHAPTER_RANK_MISS_PRIMARY: u8 = 6;

/// `found_chapter` value when the fallback guess is not among the top
/// chapter ranks.
pub const CHAPTER_RANK_MISS_FALLBACK: u8 = 5;

/// How many chapter ranks are searched for the candidate.
const CHAPTER_RANK_DEPTH: usize = 4;

/// A ranked value and the title set it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEntry {
    pub value: u64,
    pub id: u8,
}

/// Sort descending by value. The sort is stable, so equal values keep their
/// input order.
pub fn rank_descending(mut entries: Vec<RankEntry>) -> Vec<RankEntry> {
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

/// Whether `b` is close enough in size to `a` for both to hold a feature.
///
/// Integer arithmetic: `a / b == 1`, `(2a - b) / b == 1` and
/// `(a mod b) * 3 < a`.
pub fn is_dual_pair(a: u64, b: u64) -> bool {
    b != 0
        && a / b == 1
        && a.saturating_mul(2).saturating_sub(b) / b == 1
        && (a % b).saturating_mul(3) < a
}

/// Shape of the disc as seen by the size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// One title set clearly dominates by size.
    Single,
    /// The two largest title sets are similar in size and share an aspect
    /// ratio, e.g. episodes of a series.
    Multi,
    /// The two largest title sets are similar in size, have the same chapter
    /// count and differ in aspect ratio: one film in 4:3 and 16:9.
    Dual,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single feature"),
            Self::Multi => write!(f, "multiple features"),
            Self::Dual => write!(f, "dual format feature"),
        }
    }
}

/// Which rule accepted the guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// The size-based candidate had a full score and top chapter rank.
    FirstCandidate,
    /// The title set with most chapters among similar-sized ones.
    MultiFeature,
    /// The largest title set with a full score.
    LargestFullScore,
    /// The largest title set with a partial score and a top chapter rank.
    LargestPartialScore,
    /// Nothing matched; the largest title set.
    LargestByDefault,
}

impl fmt::Display for Acceptance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstCandidate => write!(f, "first candidate"),
            Self::MultiFeature => write!(f, "most chapters among similar title sets"),
            Self::LargestFullScore => write!(f, "largest title set, full score"),
            Self::LargestPartialScore => write!(f, "largest title set, partial score"),
            Self::LargestByDefault => write!(f, "largest title set"),
        }
    }
}

/// Outcome of the main feature guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainFeatureGuess {
    pub title_set: u8,
    pub classification: Classification,
    pub accepted_by: Acceptance,
    /// How many of the audio, subpicture and channel rankings the title set
    /// tops (0..=3).
    pub score: u8,
    /// 1-based position among the top chapter ranks, or a miss sentinel.
    pub found_chapter: u8,
}

struct Ranks {
    chapters: Vec<RankEntry>,
    angles: Vec<RankEntry>,
    subpictures: Vec<RankEntry>,
    audio: Vec<RankEntry>,
    sizes: Vec<RankEntry>,
    channels: Vec<RankEntry>,
}

impl Ranks {
    fn build(titles: &TitleCatalog, sizes: &TitleSetCatalog) -> Self {
        let per_title = |value: fn(&TitleRecord) -> u64| {
            rank_descending(
                titles
                    .titles()
                    .iter()
                    .filter(|t| titles.features(t.title_set).is_some())
                    .map(|t| RankEntry {
                        value: value(t),
                        id: t.title_set,
                    })
                    .collect(),
            )
        };

        let title_sets = 1..=titles.title_set_count();
        let per_set = |value: &dyn Fn(u8) -> u64| {
            rank_descending(
                title_sets
                    .clone()
                    .map(|ts| RankEntry {
                        value: value(ts),
                        id: ts,
                    })
                    .collect(),
            )
        };

        let feature = |ts: u8, f: fn(&TitleSetFeatures) -> u8| {
            titles.features(ts).map(|x| f(x) as u64).unwrap_or(0)
        };

        Self {
            chapters: per_title(|t| t.chapter_count as u64),
            angles: per_title(|t| t.angle_count as u64),
            subpictures: per_set(&|ts| feature(ts, |f| f.subpicture_count)),
            audio: per_set(&|ts| feature(ts, |f| f.audio_track_count)),
            sizes: per_set(&|ts| sizes.get(ts).map(|s| s.title_vob_size()).unwrap_or(0)),
            channels: per_set(&|ts| feature(ts, |f| f.max_audio_channels)),
        }
    }

    /// Count the audio, subpicture and channel rankings where `candidate`
    /// appears among the entries tied for the top value.
    fn score(&self, candidate: u8) -> u8 {
        [&self.audio, &self.subpictures, &self.channels]
            .into_iter()
            .filter(|list| in_top_group(list, candidate))
            .count() as u8
    }

    fn found_chapter(&self, candidate: u8, miss: u8) -> u8 {
        self.chapters
            .iter()
            .take(CHAPTER_RANK_DEPTH)
            .position(|e| e.id == candidate)
            .map(|p| p as u8 + 1)
            .unwrap_or(miss)
    }
}

fn in_top_group(list: &[RankEntry], candidate: u8) -> bool {
    let Some(top) = list.first() else {
        return false;
    };
    list.iter()
        .take_while(|e| e.value >= top.value)
        .any(|e| e.id == candidate)
}

/// Guess which title set holds the main feature.
pub fn select_main_title_set(
    titles: &TitleCatalog,
    sizes: &TitleSetCatalog,
    preferred_aspect: AspectRatio,
) -> MainFeatureGuess {
    let ranks = Ranks::build(titles, sizes);
    let largest = ranks.sizes.first().map(|e| e.id).unwrap_or(1);
    let aspect_of = |ts: u8| titles.features(ts).map(|f| f.aspect_ratio);

    log::trace!(
        "Rankings: chapters {:?}, angles {:?}, sizes {:?}",
        ranks.chapters,
        ranks.angles,
        ranks.sizes
    );

    let mut classification = Classification::Single;
    let mut candidate = largest;

    if ranks.sizes.len() > 1 && is_dual_pair(ranks.sizes[0].value, ranks.sizes[1].value) {
        let first = ranks.sizes[0].id;
        let second = ranks.sizes[1].id;
        if aspect_of(first) == aspect_of(second) {
            classification = Classification::Multi;
            candidate = first;
        } else if titles.chapters_of(first) == titles.chapters_of(second) {
            classification = Classification::Dual;
            candidate = if aspect_of(first) == Some(preferred_aspect) {
                first
            } else if aspect_of(second) == Some(preferred_aspect) {
                second
            } else {
                log::warn!(
                    "Neither dual format title set has the preferred aspect ratio {}; using the largest",
                    preferred_aspect
                );
                first
            };
        }
    }

    let mut score = ranks.score(candidate);
    let mut found_chapter = ranks.found_chapter(candidate, CHAPTER_RANK_MISS_PRIMARY);
    log::debug!(
        "Main feature candidate: title set {} ({}), score {}, chapter rank {}",
        candidate,
        classification,
        score,
        found_chapter
    );

    let guess = |title_set, accepted_by, score, found_chapter| MainFeatureGuess {
        title_set,
        classification,
        accepted_by,
        score,
        found_chapter,
    };

    let accepted = match classification {
        Classification::Single => score == 3 && found_chapter == 1,
        Classification::Dual => score == 3 && found_chapter < 3,
        Classification::Multi => false,
    };
    if accepted {
        return guess(candidate, Acceptance::FirstCandidate, score, found_chapter);
    }

    if classification == Classification::Multi {
        let reference = ranks.sizes[0].value;
        let run = ranks
            .sizes
            .iter()
            .take_while(|e| is_dual_pair(reference, e.value))
            .count();

        let mut best = candidate;
        let mut best_chapters = titles.chapters_of(best);
        for entry in ranks.sizes.iter().take(run) {
            let chapters = titles.chapters_of(entry.id);
            if chapters > best_chapters {
                best = entry.id;
                best_chapters = chapters;
            }
        }
        candidate = best;
        score = ranks.score(candidate);
        log::debug!(
            "Multi feature disc: {} similar title sets, title set {} has most chapters, score {}",
            run,
            candidate,
            score
        );
        if score == 3 {
            let found = ranks.found_chapter(candidate, CHAPTER_RANK_MISS_PRIMARY);
            return guess(candidate, Acceptance::MultiFeature, score, found);
        }
    }

    candidate = largest;
    score = ranks.score(candidate);
    found_chapter = ranks.found_chapter(candidate, CHAPTER_RANK_MISS_FALLBACK);
    log::debug!(
        "Falling back to the largest title set {}: score {}, chapter rank {}",
        candidate,
        score,
        found_chapter
    );

    let accepted_by = if score == 3 {
        Acceptance::LargestFullScore
    } else if score > 1 && found_chapter <= 4 {
        Acceptance::LargestPartialScore
    } else {
        Acceptance::LargestByDefault
    };
    guess(candidate, accepted_by, score, found_chapter)
}

#[cfg(test)]
#[path = "tests/selector_tests.rs"]
mod tests;
