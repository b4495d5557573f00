/*!
 * Guardrails for corrector output.
 *
 * A corrector may only reformat: fix casing, move lines, add standard
 * screenplay vocabulary. Every proposed fix is checked against the chunk it
 * was made for before it can touch the text.
 */

use std::collections::BTreeSet;

use log::{debug, warn};

use super::chunker::Chunk;
use super::FixSpan;

/// Tokens a fix may introduce, compared upper-cased
pub const ALLOWED_ADDED_TOKENS: &[&str] = &[
    "INT.", "EXT.", "INT./EXT.", "EXT./INT.",
    "DAY", "NIGHT", "DAWN", "DUSK", "MORNING", "AFTERNOON", "EVENING",
    "CONTINUOUS", "LATER", "MOMENTS", "SAME",
    "FADE", "IN:", "OUT.", "CUT", "TO:", "DISSOLVE", "SMASH",
    "BEGIN", "END", "MONTAGE", "CHYRON:", "TITLE:",
    "O.S.", "V.O.", "CONT'D", "THE",
];

/// Bare punctuation tokens that are always allowed
pub const ALLOWED_PUNCTUATION: &[&str] = &["-", "–", ":", ".", "(", ")", ",", "'", "\""];

/// What to do with a proposed fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixVerdict {
    /// Safe to apply
    Applied,
    /// Below the confidence threshold; report only
    Suggested,
    /// Unsafe; never applied
    Rejected(String),
}

/// Thresholds for accepting corrector output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionPolicy {
    pub min_confidence: f64,
    pub max_edit_distance: usize,
}

impl Default for CorrectionPolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.8,
            max_edit_distance: 8,
        }
    }
}

impl CorrectionPolicy {
    pub fn new(min_confidence: f64, max_edit_distance: usize) -> Self {
        Self {
            min_confidence,
            max_edit_distance,
        }
    }

    /// Judge one fix against the chunk it claims to change.
    ///
    /// Rejection takes precedence over the confidence check, so an unsafe
    /// fix is never even suggested.
    pub fn evaluate(&self, chunk: &Chunk, fix: &FixSpan) -> FixVerdict {
        if fix.end_line < fix.start_line || fix.end_line >= chunk.lines.len() {
            return Self::reject(format!(
                "span {}-{} outside chunk of {} lines",
                fix.start_line,
                fix.end_line,
                chunk.lines.len()
            ));
        }

        let actual = &chunk.lines[fix.start_line..=fix.end_line];
        let matches_chunk = actual.len() == fix.original.len()
            && actual.iter().zip(&fix.original).all(|(a, b)| a.trim_end() == b.trim_end());
        if !matches_chunk {
            return Self::reject("original lines do not match the chunk".to_string());
        }

        let distance = edit_distance(&fix.original, &fix.revised);
        if distance > self.max_edit_distance {
            return Self::reject(format!("edit distance {} > {}", distance, self.max_edit_distance));
        }

        if let Some(token) = forbidden_addition(&fix.original, &fix.revised) {
            return Self::reject(format!("adds forbidden token '{}'", token));
        }

        if fix.confidence < self.min_confidence {
            debug!("Fix suggested only: confidence {} < {}", fix.confidence, self.min_confidence);
            return FixVerdict::Suggested;
        }

        FixVerdict::Applied
    }

    fn reject(reason: String) -> FixVerdict {
        warn!("Fix rejected: {}", reason);
        FixVerdict::Rejected(reason)
    }
}

fn token_set(lines: &[String], upper: bool) -> BTreeSet<String> {
    lines
        .iter()
        .flat_map(|line| line.split_whitespace())
        .map(|token| if upper { token.to_uppercase() } else { token.to_string() })
        .collect()
}

/// Size of the symmetric difference of the two token sets.
pub fn edit_distance(original: &[String], revised: &[String]) -> usize {
    let before = token_set(original, false);
    let after = token_set(revised, false);
    before.symmetric_difference(&after).count()
}

/// First added token outside the allow-list, if any.
///
/// Comparison is case-insensitive, so recasing never counts as an
/// addition. Wrapping parentheses and trailing commas are ignored so that
/// `(V.O.)` and `(CONT'D)` count as their bare forms.
pub fn forbidden_addition(original: &[String], revised: &[String]) -> Option<String> {
    let before = token_set(original, true);
    token_set(revised, true)
        .into_iter()
        .filter(|token| !before.contains(token))
        .find(|token| {
            let bare = token.trim_start_matches('(').trim_end_matches([')', ',']);
            !ALLOWED_PUNCTUATION.contains(&token.as_str())
                && !ALLOWED_ADDED_TOKENS.contains(&bare)
                && !before.contains(bare)
        })
}
