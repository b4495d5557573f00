/*!
 * Text pre-cleaning.
 *
 * Drafts exported from notes apps and word processors often start with a
 * preamble (project banners, export stamps, separators). The pre-cleaner
 * drops that preamble and hands everything from the first real line on to
 * the classifier untouched.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::patterns::collapse_whitespace;

/// Preamble noise, matched case-insensitively against the trimmed line
static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^[A-Z\s]+ PROJECT",
        r"^[A-Z\s]+ - [A-Z\s]+",
        r"^={3,}",
        r"^-{3,}",
        r"^\*{3,}$",
        r"^#{3,}",
        r"^(Exported|Generated|Created|Modified|Last updated|Version|Draft):",
        r"^ACT \d+, SCENE \d+$",
        r"^SCENE \d+$",
        r"^\[.*\]$",
        r"^\d{4}-\d{2}-\d{2}",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).expect("Invalid noise regex"))
    .collect()
});

/// Lines that start the screenplay even when they look like noise
static STRONG_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^\**(INT\.|EXT\.)",
        r"(?i)^(FADE IN|FADE OUT|CUT TO|DISSOLVE TO)",
        r"^\s*\([^)]+\)",
        r"(?i)^(TITLE|AUTHOR|CONTACT)\s*:",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid content indicator regex"))
    .collect()
});

/// Short all-caps line, typically a character cue
static CAPS_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z\s]+$").expect("Invalid caps line regex"));

static SCENE_ASTERISKS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\*+(INT\.|EXT\.)").expect("Invalid asterisk heading regex"));

static BOLD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*(.+)\*\*$").expect("Invalid bold regex"));

static ITALIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^_+(.+?)_+$").expect("Invalid italic regex"));

static HEADING_HASH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+\s*").expect("Invalid heading regex"));

fn is_noise(line: &str) -> bool {
    NOISE_PATTERNS.iter().any(|re| re.is_match(line))
}

fn is_strong_indicator(line: &str) -> bool {
    STRONG_INDICATORS.iter().any(|re| re.is_match(line))
}

/// Remove the document preamble.
///
/// Leading blank lines and noise lines are dropped until the first line of
/// content; from there on every line is kept as-is, noise-looking or not.
pub fn clean_text(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut looking_for_content = true;
    let mut dropped = 0usize;

    for line in text.split('\n') {
        if !looking_for_content {
            kept.push(line);
            continue;
        }

        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }

        if is_strong_indicator(stripped) {
            looking_for_content = false;
            kept.push(line);
            continue;
        }

        if is_noise(stripped) {
            dropped += 1;
            continue;
        }

        // Either an all-caps cue or simply the first non-noise line.
        if CAPS_LINE_REGEX.is_match(stripped) {
            debug!("Content starts at all-caps line '{}'", stripped);
        }
        looking_for_content = false;
        kept.push(line);
    }

    if dropped > 0 {
        debug!("Pre-cleaner dropped {} preamble line(s)", dropped);
    }

    kept.join("\n")
}

/// Strip markdown emphasis and heading hashes from a single trimmed line and
/// collapse its whitespace.
pub fn clean_content(content: &str) -> String {
    let mut cleaned = content.trim().to_string();

    if SCENE_ASTERISKS_REGEX.is_match(&cleaned) {
        cleaned = cleaned.trim_start_matches('*').trim_end_matches('*').trim().to_string();
    }

    if let Some(caps) = BOLD_REGEX.captures(&cleaned) {
        cleaned = caps[1].to_string();
    }

    if let Some(caps) = ITALIC_REGEX.captures(&cleaned) {
        cleaned = caps[1].to_string();
    }

    cleaned = HEADING_HASH_REGEX.replace(&cleaned, "").into_owned();

    collapse_whitespace(&cleaned)
}
