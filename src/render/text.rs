/*!
 * Plain-text screenplay layout on an 80-column page.
 */

use crate::screenplay::{ElementKind, ScreenplayElement};

use super::Renderer;

/// Column layout of the plain-text page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub page_width: usize,
    pub dialogue_left: usize,
    pub dialogue_right: usize,
    pub parenthetical_left: usize,
    pub transition_right: usize,
    /// Blank lines emitted for a page break
    pub page_break_lines: usize,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            page_width: 80,
            dialogue_left: 25,
            dialogue_right: 65,
            parenthetical_left: 31,
            transition_right: 70,
            page_break_lines: 3,
        }
    }
}

/// Renders elements as fixed-width text
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    layout: TextLayout,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: TextLayout) -> Self {
        Self { layout }
    }

    fn format_element(&self, element: &ScreenplayElement) -> Vec<String> {
        let layout = &self.layout;
        match element.kind {
            ElementKind::Blank => Vec::new(),
            ElementKind::SceneHeading
            | ElementKind::Shot
            | ElementKind::Title
            | ElementKind::MontageBegin
            | ElementKind::MontageEnd => vec![element.text.to_uppercase()],
            ElementKind::Character => vec![center(&element.text.to_uppercase(), layout.page_width)],
            ElementKind::DualDialogueCharacter => {
                vec![center(&element.text.to_uppercase(), layout.page_width / 2)]
            }
            ElementKind::Dialogue => wrap(&element.text, layout.dialogue_left, layout.dialogue_right),
            ElementKind::Parenthetical => wrap(&element.text, layout.parenthetical_left, layout.dialogue_right),
            ElementKind::Transition => {
                vec![format!("{:>width$}", element.text.to_uppercase(), width = layout.transition_right)]
            }
            ElementKind::PageBreak => vec![String::new(); layout.page_break_lines],
            _ => wrap(&element.text, 0, layout.page_width),
        }
    }

    /// Whether a blank line separates this element from the next non-blank one
    fn needs_spacing_after(elements: &[ScreenplayElement], index: usize) -> bool {
        let element = &elements[index];
        if element.kind == ElementKind::Blank {
            return false;
        }
        let Some(next) = elements[index + 1..].iter().find(|e| e.kind != ElementKind::Blank) else {
            return false;
        };

        let in_dialogue = |kind: ElementKind| matches!(kind, ElementKind::Dialogue | ElementKind::Parenthetical);

        match element.kind {
            ElementKind::SceneHeading | ElementKind::Shot | ElementKind::Transition => true,
            ElementKind::Action if next.kind != ElementKind::Action => true,
            kind if in_dialogue(kind) && !in_dialogue(next.kind) => true,
            ElementKind::PageBreak => false,
            kind => next.kind.is_character_cue() && !in_dialogue(kind),
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, elements: &[ScreenplayElement]) -> String {
        let mut lines = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            lines.extend(self.format_element(element));
            if Self::needs_spacing_after(elements, index) {
                lines.push(String::new());
            }
        }
        lines.join("\n")
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// Greedy word wrap between two columns
fn wrap(text: &str, left: usize, right: usize) -> Vec<String> {
    let width = right.saturating_sub(left).max(1);
    let indent = " ".repeat(left);
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > width && !current.is_empty() {
            lines.push(format!("{}{}", indent, current.join(" ")));
            current.clear();
            current_len = 0;
        }
        current_len = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        current.push(word);
    }

    if !current.is_empty() {
        lines.push(format!("{}{}", indent, current.join(" ")));
    }
    lines
}
