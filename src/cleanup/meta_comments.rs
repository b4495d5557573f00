/*!
 * Meta-comment removal.
 *
 * Strips production notes (`[TODO: ...]`, `(NOTE: ...)`, `// ...`) from the
 * text-bearing elements of a screenplay and keeps a record of what was
 * removed.
 */

use std::collections::BTreeMap;

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::screenplay::patterns::{collapse_whitespace, META_COMMENT_REGEX, PAREN_NOTE_REGEX};
use crate::screenplay::{ElementKind, ScreenplayElement};

static LINE_COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s//.*$|^//.*$").expect("Invalid line comment regex"));

/// Markers that make a match real screenplay content rather than a note
const FALSE_POSITIVE_MARKERS: &[&str] = &["SCENE", "ACT", "SEQUENCE"];

fn is_false_positive(comment: &str) -> bool {
    let upper = comment.to_uppercase();
    FALSE_POSITIVE_MARKERS.iter().any(|m| upper.contains(m))
}

fn is_cleanable(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Action
            | ElementKind::Dialogue
            | ElementKind::SceneHeading
            | ElementKind::Parenthetical
    )
}

/// Record of one removed comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedComment {
    pub source_line: usize,
    pub element_kind: ElementKind,
    pub original_text: String,
    pub cleaned_text: String,
    pub comment: String,
}

/// Split a line into its cleaned text and the comments found in it.
pub fn clean_comments(text: &str) -> (String, Vec<String>) {
    let mut comments: Vec<String> = META_COMMENT_REGEX.find_iter(text).map(|m| m.as_str().to_string()).collect();
    let mut cleaned = META_COMMENT_REGEX.replace_all(text, " ").into_owned();

    for pattern in [&*PAREN_NOTE_REGEX, &*LINE_COMMENT_REGEX] {
        let found: Vec<String> = pattern
            .find_iter(&cleaned)
            .map(|m| m.as_str().trim().to_string())
            .filter(|m| !is_false_positive(m))
            .collect();
        if found.is_empty() {
            continue;
        }
        cleaned = pattern
            .replace_all(&cleaned, |caps: &regex::Captures| {
                if is_false_positive(&caps[0]) { caps[0].to_string() } else { " ".to_string() }
            })
            .into_owned();
        comments.extend(found);
    }

    (collapse_whitespace(&cleaned), comments)
}

/// Removes meta-comments from screenplay elements
#[derive(Debug, Default)]
pub struct MetaCommentRemover {
    removed: Vec<RemovedComment>,
}

impl MetaCommentRemover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove comments; elements left empty are dropped.
    pub fn remove(&mut self, elements: &[ScreenplayElement]) -> Vec<ScreenplayElement> {
        self.removed.clear();
        let mut kept = Vec::with_capacity(elements.len());

        for element in elements {
            if !is_cleanable(element.kind) {
                kept.push(element.clone());
                continue;
            }

            let (cleaned, comments) = clean_comments(&element.text);
            if comments.is_empty() {
                kept.push(element.clone());
                continue;
            }

            for comment in comments {
                self.removed.push(RemovedComment {
                    source_line: element.source_line,
                    element_kind: element.kind,
                    original_text: element.text.clone(),
                    cleaned_text: cleaned.clone(),
                    comment,
                });
            }

            if cleaned.is_empty() {
                debug!("Line {}: dropped, only a meta-comment", element.source_line);
                continue;
            }
            let mut updated = element.clone();
            updated.text = cleaned;
            kept.push(updated);
        }

        info!("Removed {} meta-comment(s)", self.removed.len());
        kept
    }

    pub fn removed(&self) -> &[RemovedComment] {
        &self.removed
    }

    /// Whether any cleanable element carries a comment
    pub fn has_meta_comments(elements: &[ScreenplayElement]) -> bool {
        elements
            .iter()
            .filter(|e| is_cleanable(e.kind))
            .any(|e| !clean_comments(&e.text).1.is_empty())
    }

    /// Comments that `remove` would strip, without changing anything
    pub fn preview(elements: &[ScreenplayElement]) -> Vec<String> {
        elements
            .iter()
            .filter(|e| is_cleanable(e.kind))
            .flat_map(|e| clean_comments(&e.text).1)
            .collect()
    }

    /// Human-readable summary of the last removal
    pub fn report(&self) -> String {
        if self.removed.is_empty() {
            return "No meta-comments found.".to_string();
        }

        let mut lines = vec![
            "Meta-Comment Removal Report".to_string(),
            "=".repeat(60),
            String::new(),
            format!("Total meta-comments removed: {}", self.removed.len()),
            String::new(),
        ];

        let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for removal in &self.removed {
            *by_kind.entry(removal.element_kind.name()).or_insert(0) += 1;
        }
        for (kind, count) in by_kind {
            lines.push(format!("{}: {} comments removed", kind, count));
        }

        lines.push(String::new());
        lines.push("Detailed Removals:".to_string());
        lines.push("-".repeat(60));
        for removal in &self.removed {
            lines.push(format!("Line {} ({}):", removal.source_line, removal.element_kind));
            lines.push(format!("  Removed: {}", removal.comment));
            lines.push(format!("  Before: {}", truncate(&removal.original_text, 80)));
            lines.push(format!("  After:  {}", truncate(&removal.cleaned_text, 80)));
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max).collect::<String>())
    }
}
