/*!
 * Pattern tables shared by the cleaner, the classifier and the validator.
 *
 * All patterns are compiled once on first use.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Scene heading as recognised by the classifier (lenient, case-insensitive).
pub static SCENE_HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(INT\./EXT\.|EXT\./INT\.|INT\.|EXT\.|I/E\.|INT|EXT)\s+.+(-\s+(DAY|NIGHT|DAWN|DUSK|MORNING|AFTERNOON|EVENING|CONTINUOUS|LATER|MOMENTS LATER|SAME)(\s*\([^)]+\))?)?$",
    )
    .expect("Invalid scene heading regex")
});

/// Scene heading as required by the validator (applied to upper-cased text).
pub static STRICT_SCENE_HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(INT\.|EXT\.|INT\./EXT\.|EXT\./INT\.)\s+[A-Z0-9\s\-,.'"&()/]+\s*(-\s*(DAY|NIGHT|DAWN|DUSK|MORNING|AFTERNOON|EVENING|CONTINUOUS|LATER|MOMENTS LATER|SAME)(\s*\([^)]+\))?)?$"#,
    )
    .expect("Invalid strict scene heading regex")
});

pub static TRANSITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(FADE IN:|FADE OUT\.|FADE TO:|CUT TO:|DISSOLVE TO:|MATCH CUT TO:|JUMP CUT TO:|SMASH CUT TO:|TIME CUT:|FADE TO BLACK\.|THE END)$",
    )
    .expect("Invalid transition regex")
});

pub static MONTAGE_BEGIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(BEGIN MONTAGE|MONTAGE BEGINS|MONTAGE:|MONTAGE -)$")
        .expect("Invalid montage begin regex")
});

pub static MONTAGE_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(END MONTAGE|MONTAGE ENDS|END OF MONTAGE)$")
        .expect("Invalid montage end regex")
});

/// On-screen title / chyron prefix
pub static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(TITLE:|CHYRON:|SUPER:|SUBTITLE:|CARD:)").expect("Invalid title regex")
});

pub static PARENTHETICAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(.+\)$").expect("Invalid parenthetical regex"));

/// Camera direction headers (CLOSE ON, ANGLE ON, POV, ...)
pub static SHOT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(CLOSE ON|CLOSEUP ON|CLOSE UP ON|ANGLE ON|WIDE SHOT|WIDER SHOT|WIDEST SHOT|NEW ANGLE|ANOTHER ANGLE|REVERSE ANGLE|POV|P\.O\.V\.|INSERT|AERIAL SHOT|ESTABLISHING SHOT|MOVING SHOT|TRACKING SHOT|CRANE SHOT|HANDHELD SHOT)[\s:]",
    )
    .expect("Invalid shot regex")
});

pub static PAGE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(===|PAGE BREAK|---PAGE---|NEW PAGE)$").expect("Invalid page break regex")
});

/// Continuation marker at the bottom of a page
pub static MORE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\(\s*MORE\s*\)$").expect("Invalid more regex"));

/// A line that is nothing but a bracketed cue, e.g. `[GUNSHOT]`
pub static BRACKETED_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\]]+\]$").expect("Invalid bracketed regex"));

pub static TITLE_PAGE_TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^TITLE\s*:").expect("Invalid title page title regex"));

pub static TITLE_PAGE_AUTHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^AUTHORS?\s*:").expect("Invalid title page author regex")
});

pub static TITLE_PAGE_CONTACT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^CONTACT\s*:").expect("Invalid title page contact regex")
});

/// Standalone credit phrase on a title page ("by", "written by", ...)
pub static TITLE_PAGE_CREDIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^((written|screenplay|story|teleplay|adapted|created)\s+)?(and\s+)?by:?$",
    )
    .expect("Invalid title page credit regex")
});

/// Bracketed production notes left in a draft, e.g. `[TODO: fix this]`
pub static META_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\[(?:(?:NOTE|TODO|FIXME|DECIDE|MAYBE|REMINDER|TBD|SHOOT|CUT|EDIT|REVIEW|CHECK|QUESTION|TEMP|PLACEHOLDER|TK|XXX|HACK|BUG|WARNING)\b|Q:).*?\]",
    )
    .expect("Invalid meta comment regex")
});

/// Parenthesised production notes, e.g. `(NOTE: reshoot)`
pub static PAREN_NOTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\((?:NOTE|TODO|FIXME):[^)]+\)").expect("Invalid parenthetical note regex")
});

/// Trailing cue extension such as `(V.O.)` or `(CONT'D)`
pub static TRAILING_EXTENSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("Invalid extension regex"));

/// Character cue extensions recognised by the classifier.
pub const CHARACTER_EXTENSIONS: &[&str] = &[
    "(V.O./CONT'D)",
    "(O.S./CONT'D)",
    "(O.C./CONT'D)",
    "(V.O.)",
    "(O.S.)",
    "(O.C.)",
    "(CONT'D)",
];

/// Marker placed before the second speaker of a dual dialogue pair.
pub const DUAL_DIALOGUE_MARKER: char = '^';

/// Transitions accepted by the validator as-is.
pub const STANDARD_TRANSITIONS: &[&str] = &[
    "FADE IN:",
    "FADE OUT.",
    "FADE TO:",
    "CUT TO:",
    "DISSOLVE TO:",
    "MATCH CUT TO:",
    "JUMP CUT TO:",
    "SMASH CUT TO:",
    "TIME CUT:",
    "FADE TO BLACK.",
    "THE END",
];

/// Time-of-day tokens that may close a scene heading.
pub const TIME_OF_DAY: &[&str] = &[
    "DAY",
    "NIGHT",
    "DAWN",
    "DUSK",
    "MORNING",
    "AFTERNOON",
    "EVENING",
    "CONTINUOUS",
    "LATER",
    "SAME",
];

/// Python-style `isupper`: at least one cased character and no lowercase ones.
pub fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
