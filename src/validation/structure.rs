/*!
 * Structural rules: scene headings, cue casing, block ordering,
 * parenthetical shape and transition vocabulary.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::screenplay::patterns::{is_all_caps, STANDARD_TRANSITIONS, STRICT_SCENE_HEADING_REGEX, TIME_OF_DAY};
use crate::screenplay::{ElementKind, ScreenplayElement};

use super::findings::{ErrorCode, ValidationFinding};

static WRAPPED_PARENTHETICAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([^)]+\)$").expect("Invalid wrapped parenthetical regex"));

/// Prefix rewrites tried in order; the first matching prefix wins.
const HEADING_PREFIXES: &[(&str, &str)] = &[
    ("INT./EXT.", "INT./EXT."),
    ("EXT./INT.", "EXT./INT."),
    ("INT./EXT ", "INT./EXT. "),
    ("EXT./INT ", "EXT./INT. "),
    ("INT/EXT ", "INT./EXT. "),
    ("EXT/INT ", "EXT./INT. "),
    ("I/E.", "INT./EXT."),
    ("I/E ", "INT./EXT. "),
    ("INT.", "INT."),
    ("EXT.", "EXT."),
    ("INT ", "INT. "),
    ("EXT ", "EXT. "),
];

/// E1: scene heading format
pub fn check_scene_headings(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    elements
        .iter()
        .filter(|e| e.kind == ElementKind::SceneHeading)
        .filter(|e| !STRICT_SCENE_HEADING_REGEX.is_match(&e.text.to_uppercase()))
        .map(|e| {
            let suggestion = suggest_scene_heading(&e.text);
            let confidence = if suggestion.is_some() { 0.8 } else { 0.3 };
            ValidationFinding::new(
                e,
                ErrorCode::InvalidSceneHeading,
                format!("Invalid scene heading format: {}", e.text),
                confidence,
            )
            .with_suggestion(suggestion)
        })
        .collect()
}

/// Mechanical repair of a scene heading, if one applies.
///
/// Only the INT/EXT prefix is rewritten. A bare trailing time of day gets
/// its dash; a heading without any time of day gets `- DAY`.
pub fn suggest_scene_heading(text: &str) -> Option<String> {
    let upper = text.trim().to_uppercase();

    let (from, to) = HEADING_PREFIXES.iter().find(|(from, _)| upper.starts_with(from))?;
    let rest = upper[from.len()..].trim();
    if rest.is_empty() {
        return None;
    }
    let mut repaired = format!("{} {}", to.trim_end(), rest);

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let has_time_of_day = tokens.iter().any(|t| TIME_OF_DAY.contains(&t.trim_matches(|c: char| !c.is_alphanumeric())));

    if !has_time_of_day {
        repaired.push_str(" - DAY");
    } else if let Some(last) = tokens.last() {
        let dashed = tokens.len() >= 2 && tokens[tokens.len() - 2].ends_with('-');
        if TIME_OF_DAY.contains(last) && !dashed && tokens.len() >= 2 {
            let head = tokens[..tokens.len() - 1].join(" ");
            repaired = format!("{} {} - {}", to.trim_end(), head, last);
        }
    }

    if repaired == upper { None } else { Some(repaired) }
}

/// E2: character cues must be upper-case
pub fn check_character_caps(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    elements
        .iter()
        .filter(|e| e.kind.is_character_cue() && !is_all_caps(&e.text))
        .map(|e| {
            ValidationFinding::new(
                e,
                ErrorCode::CharacterNotCaps,
                format!("Character name should be in ALL CAPS: {}", e.text),
                0.95,
            )
            .with_suggestion(Some(e.text.to_uppercase()))
        })
        .collect()
}

/// E3: dialogue must follow a cue, a parenthetical or more dialogue
pub fn check_dialogue_placement(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        if element.kind != ElementKind::Dialogue {
            continue;
        }
        let placed = i > 0 && {
            let prev = elements[i - 1].kind;
            prev.is_character_cue() || matches!(prev, ElementKind::Parenthetical | ElementKind::Dialogue)
        };
        if !placed {
            findings.push(ValidationFinding::new(
                element,
                ErrorCode::OrphanedDialogue,
                "Dialogue must follow a character name or parenthetical",
                0.9,
            ));
        }
    }
    findings
}

/// E6: parentheticals must follow a cue or dialogue
pub fn check_parenthetical_placement(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        if element.kind != ElementKind::Parenthetical {
            continue;
        }
        let placed = i > 0 && {
            let prev = elements[i - 1].kind;
            prev.is_character_cue() || prev == ElementKind::Dialogue
        };
        if !placed {
            findings.push(ValidationFinding::new(
                element,
                ErrorCode::OrphanedParenthetical,
                "Parenthetical must follow a character name or dialogue",
                0.85,
            ));
        }
    }
    findings
}

/// E4: parentheticals must be wrapped in a single pair of parentheses
pub fn check_parenthetical_shape(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    elements
        .iter()
        .filter(|e| e.kind == ElementKind::Parenthetical && !WRAPPED_PARENTHETICAL_REGEX.is_match(&e.text))
        .map(|e| {
            let inner = e.text.trim_matches(|c| c == '(' || c == ')').trim();
            ValidationFinding::new(
                e,
                ErrorCode::MalformedParenthetical,
                "Parenthetical must be enclosed in a single pair of parentheses",
                0.9,
            )
            .with_suggestion(Some(format!("({})", inner)))
        })
        .collect()
}

/// E5: transitions must come from the standard vocabulary
pub fn check_transitions(elements: &[ScreenplayElement]) -> Vec<ValidationFinding> {
    elements
        .iter()
        .filter(|e| e.kind == ElementKind::Transition)
        .filter(|e| !STANDARD_TRANSITIONS.contains(&e.text.trim().to_uppercase().as_str()))
        .map(|e| {
            let suggestion = closest_transition(&e.text);
            let confidence = if suggestion.is_some() { 0.7 } else { 0.4 };
            ValidationFinding::new(
                e,
                ErrorCode::NonStandardTransition,
                format!("Non-standard transition: {}", e.text),
                confidence,
            )
            .with_suggestion(suggestion.map(str::to_string))
        })
        .collect()
}

/// Keyword-based nearest standard transition
pub fn closest_transition(text: &str) -> Option<&'static str> {
    let upper = text.to_uppercase();
    let words: Vec<&str> = upper
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has = |word: &str| words.contains(&word);

    if has("FADE") {
        if has("IN") {
            Some("FADE IN:")
        } else if has("OUT") {
            Some("FADE OUT.")
        } else if has("BLACK") {
            Some("FADE TO BLACK.")
        } else {
            Some("FADE TO:")
        }
    } else if has("CUT") {
        if has("MATCH") {
            Some("MATCH CUT TO:")
        } else if has("JUMP") {
            Some("JUMP CUT TO:")
        } else if has("SMASH") {
            Some("SMASH CUT TO:")
        } else if has("TIME") {
            Some("TIME CUT:")
        } else {
            Some("CUT TO:")
        }
    } else if has("DISSOLVE") {
        Some("DISSOLVE TO:")
    } else if has("END") {
        Some("THE END")
    } else {
        None
    }
}
