/*!
 * Content rules: meta-comments, casual language, redundant lines and
 * action hidden in parentheticals.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::screenplay::patterns::{collapse_whitespace, META_COMMENT_REGEX};
use crate::screenplay::{ElementKind, ScreenplayElement};

use super::findings::{ErrorCode, ValidationFinding};

/// Informal abbreviations and their written-out forms
pub const CASUAL_ABBREVIATIONS: &[(&str, &str)] = &[
    ("idk", "I don't know"),
    ("tbh", "to be honest"),
    ("lol", "ha"),
    ("lmao", "ha"),
    ("omg", "oh my God"),
    ("wtf", "what the hell"),
    ("btw", "by the way"),
    ("imo", "in my opinion"),
    ("imho", "in my humble opinion"),
    ("brb", "be right back"),
    ("ngl", "not gonna lie"),
    ("smh", "unbelievable"),
    ("fyi", "for your information"),
    ("irl", "in real life"),
    ("rn", "right now"),
];

static CASUAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    let words: Vec<&str> = CASUAL_ABBREVIATIONS.iter().map(|(abbr, _)| *abbr).collect();
    Regex::new(&format!(r"(?i)\b({})\b", words.join("|"))).expect("Invalid casual language regex")
});

/// Physical action that belongs on an action line
static ACTION_VERB_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(walks|runs|stands up|sits down|grabs|picks up|crosses to|enters|exits|opens|closes|throws|pulls out|hands|reaches for|moves to|slams|kicks|jumps)\b",
    )
    .expect("Invalid action verb regex")
});

static ELLIPSIS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\.\.|…").expect("Invalid ellipsis regex"));

static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(for|after)\s+(a\s+few\s+|a\s+|several\s+|\d+\s+)?(seconds?|minutes?|hours?|moments?)\b")
        .expect("Invalid duration regex")
});

/// Parentheticals longer than this read as stage directions
const MAX_PARENTHETICAL_LENGTH: usize = 50;

/// Minimum lengths for a line to count as redundant
const MIN_REDUNDANT_DIALOGUE: usize = 20;
const MIN_REDUNDANT_ACTION: usize = 30;

fn carries_meta_comments(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Action | ElementKind::Dialogue | ElementKind::SceneHeading
    )
}

/// Text with all bracketed annotations removed
pub fn strip_meta_comments(text: &str) -> String {
    collapse_whitespace(&META_COMMENT_REGEX.replace_all(text, " "))
}

/// E7: production notes left in the text
pub fn check_meta_comments(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    elements
        .iter()
        .filter(|e| carries_meta_comments(e.kind))
        .filter_map(|e| {
            let comment = META_COMMENT_REGEX.find(&e.text)?;
            let stripped = strip_meta_comments(&e.text);
            let suggestion = (!stripped.is_empty()).then_some(stripped);
            Some(
                ValidationFinding::new(
                    e,
                    ErrorCode::MetaCommentPresent,
                    format!("Meta-comment should be removed: {}", comment.as_str()),
                    0.95,
                )
                .with_suggestion(suggestion),
            )
        })
        .collect()
}

/// E8: informal abbreviations in dialogue
pub fn check_casual_language(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    elements
        .iter()
        .filter(|e| e.kind == ElementKind::Dialogue)
        .filter_map(|e| {
            let found: Vec<String> = CASUAL_REGEX.find_iter(&e.text).map(|m| m.as_str().to_string()).collect();
            if found.is_empty() {
                return None;
            }
            let expanded = CASUAL_REGEX.replace_all(&e.text, |caps: &regex::Captures| {
                let word = caps[1].to_lowercase();
                CASUAL_ABBREVIATIONS
                    .iter()
                    .find(|(abbr, _)| *abbr == word)
                    .map(|(_, expansion)| expansion.to_string())
                    .unwrap_or_else(|| caps[1].to_string())
            });
            Some(
                ValidationFinding::new(
                    e,
                    ErrorCode::CasualLanguage,
                    format!("Casual abbreviation(s) in dialogue: {}", found.join(", ")),
                    0.85,
                )
                .with_suggestion(Some(expanded.into_owned())),
            )
        })
        .collect()
}

/// E10: long dialogue or action lines repeated verbatim
pub fn check_redundant_content(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut findings = Vec::new();

    for element in elements {
        let length = element.text.chars().count();
        let eligible = match element.kind {
            ElementKind::Dialogue => length > MIN_REDUNDANT_DIALOGUE,
            ElementKind::Action => length > MIN_REDUNDANT_ACTION,
            _ => false,
        };
        if !eligible {
            continue;
        }

        let normalized = collapse_whitespace(&element.text.to_lowercase());
        match first_seen.get(&normalized) {
            Some(first_line) => findings.push(ValidationFinding::new(
                element,
                ErrorCode::RedundantContent,
                format!("Repeats line {}", first_line),
                0.7,
            )),
            None => {
                first_seen.insert(normalized, element.source_line);
            }
        }
    }

    findings
}

/// Rewrite a parenthetical as a sentence for an action line
pub fn parenthetical_as_action(text: &str) -> String {
    let inner = text.trim().trim_start_matches('(').trim_end_matches(')').trim();
    let mut chars = inner.chars();
    let mut sentence = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    if !sentence.is_empty() && !sentence.ends_with(['.', '!', '?']) {
        sentence.push('.');
    }
    sentence
}

/// E11: parentheticals that describe action
pub fn check_parenthetical_action(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    elements
        .iter()
        .filter(|e| e.kind == ElementKind::Parenthetical)
        .filter_map(|e| {
            let describes_action = ACTION_VERB_REGEX.is_match(&e.text)
                || ELLIPSIS_REGEX.is_match(&e.text)
                || DURATION_REGEX.is_match(&e.text);
            let too_long = e.text.chars().count() > MAX_PARENTHETICAL_LENGTH;

            let (message, confidence) = if describes_action {
                ("Parenthetical describes action; move it to an action line", 0.8)
            } else if too_long {
                ("Parenthetical is too long; move it to an action line", 0.75)
            } else {
                return None;
            };

            Some(
                ValidationFinding::new(e, ErrorCode::MisplacedActionInParenthetical, message, confidence)
                    .with_suggestion(Some(parenthetical_as_action(&e.text))),
            )
        })
        .collect()
}
