/*!
 * Screenplay parser: pre-clean, classify line by line, post-process.
 */

use log::{debug, info};

use super::classifier::{classify, ParserState};
use super::cleaner::{clean_content, clean_text};
use super::element::{ElementKind, ScreenplayElement};
use super::post_process::post_process;

/// Parser for plain-text screenplay drafts.
///
/// The parser carries no state between calls; each `parse` starts from a
/// fresh `ParserState`, so one instance can be shared freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenplayParser;

impl ScreenplayParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse text into one element per line of the cleaned text.
    pub fn parse(&self, text: &str) -> Vec<ScreenplayElement> {
        if text.is_empty() {
            return Vec::new();
        }

        let elements = self.parse_cleaned(&clean_text(text));

        info!(
            "Parsed {} lines ({} scenes)",
            elements.len(),
            elements.iter().filter(|e| e.kind == ElementKind::SceneHeading).count()
        );
        elements
    }

    /// Parse text that has already been through `clean_text`, keeping line
    /// numbers aligned with it.
    pub fn parse_cleaned(&self, cleaned: &str) -> Vec<ScreenplayElement> {
        let mut elements = self.classify_lines(cleaned);
        post_process(&mut elements);
        elements
    }

    /// Classify already-cleaned text without the post-processing pass.
    pub fn classify_lines(&self, cleaned: &str) -> Vec<ScreenplayElement> {
        let mut state = ParserState::new();
        let mut elements = Vec::new();

        for (index, raw_line) in cleaned.split('\n').enumerate() {
            let content = clean_content(raw_line);
            let element = classify(raw_line, &content, index + 1, &state);
            state.update(element.kind);
            elements.push(element);
        }

        debug!(
            "Classifier finished: in_dialogue_block={}, in_montage={}",
            state.in_dialogue_block, state.in_montage
        );
        elements
    }
}
