//! FILENAME: core/filler/src/matcher.rs
//! PURPOSE: Approximate string similarity between a field name and a label.
//! CONTEXT: Scores are the 0-100 indel ratio over lowercased text:
//! 2 * matched characters / combined length.

/// Acceptance threshold used when a caller does not supply one.
pub const DEFAULT_MATCH_THRESHOLD: u32 = 80;

/// Best candidate found by `fuzzy_match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome<'a> {
    pub best: Option<&'a str>,
    pub score: u32,
}

impl<'a> MatchOutcome<'a> {
    pub fn none() -> Self {
        MatchOutcome { best: None, score: 0 }
    }

    pub fn is_match(&self) -> bool {
        self.best.is_some()
    }
}

/// Similarity of `a` and `b` on a 0-100 scale, case-insensitive.
/// 100 means identical after lowercasing.
pub fn similarity(a: &str, b: &str) -> u32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    (rapidfuzz::fuzz::ratio(a.chars(), b.chars()) * 100.0).round() as u32
}

/// Finds the candidate most similar to `target`.
///
/// Returns the best candidate with its score when the score reaches
/// `threshold`, otherwise `MatchOutcome::none()`. The first candidate to
/// reach the maximum score wins ties.
pub fn fuzzy_match<'a, I>(target: &str, candidates: I, threshold: u32) -> MatchOutcome<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<&'a str> = None;
    let mut highest = 0u32;

    for candidate in candidates {
        let score = similarity(target, candidate);
        if best.is_none() || score > highest {
            highest = score;
            best = Some(candidate);
        }
    }

    match best {
        Some(candidate) if highest >= threshold => MatchOutcome { best: Some(candidate), score: highest },
        _ => MatchOutcome::none(),
    }
}
