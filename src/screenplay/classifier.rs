/*!
 * Line classifier and parser state machine.
 *
 * Classification is an ordered list of rules; the first rule that claims a
 * line decides its kind. Several rules read the `ParserState`, which is
 * updated after every line (blank lines included).
 */

use log::trace;

use super::element::{base_character_name, ElementKind, ScreenplayElement};
use super::patterns::{
    is_all_caps, BRACKETED_REGEX, DUAL_DIALOGUE_MARKER, MONTAGE_BEGIN_REGEX, MONTAGE_END_REGEX,
    MORE_REGEX, PAGE_BREAK_REGEX, PARENTHETICAL_REGEX, SCENE_HEADING_REGEX, SHOT_REGEX,
    TITLE_PAGE_AUTHOR_REGEX, TITLE_PAGE_CONTACT_REGEX, TITLE_PAGE_CREDIT_REGEX,
    TITLE_PAGE_TITLE_REGEX, TITLE_REGEX, TRANSITION_REGEX,
};

/// Maximum number of words in a character cue
const MAX_CUE_WORDS: usize = 4;

/// Character cues must be shorter than this
const MAX_CUE_LENGTH: usize = 50;

/// Transient state threaded through a single parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserState {
    /// Kind of the most recent non-blank element
    pub last_nonblank_kind: Option<ElementKind>,
    pub in_dialogue_block: bool,
    pub in_montage: bool,
    pub expecting_dialogue: bool,
    /// True until the first scene heading or transition
    pub in_title_page: bool,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            last_nonblank_kind: None,
            in_dialogue_block: false,
            in_montage: false,
            expecting_dialogue: false,
            in_title_page: true,
        }
    }
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state past an element of the given kind.
    pub fn update(&mut self, kind: ElementKind) {
        match kind {
            ElementKind::Character | ElementKind::DualDialogueCharacter => {
                self.in_dialogue_block = true;
                self.expecting_dialogue = true;
            }
            ElementKind::Dialogue => {
                self.expecting_dialogue = false;
            }
            ElementKind::Parenthetical => {
                self.expecting_dialogue = true;
            }
            ElementKind::Blank => {
                // Dialogue may resume after a single blank line.
                self.in_dialogue_block = self.last_nonblank_kind == Some(ElementKind::Dialogue);
                self.expecting_dialogue = false;
            }
            ElementKind::Action => {
                self.exit_dialogue_block();
            }
            ElementKind::SceneHeading | ElementKind::Transition => {
                self.exit_dialogue_block();
                self.in_title_page = false;
            }
            ElementKind::MontageBegin => self.in_montage = true,
            ElementKind::MontageEnd => self.in_montage = false,
            _ => {}
        }

        if kind != ElementKind::Blank && kind != ElementKind::More {
            self.last_nonblank_kind = Some(kind);
        }
    }

    fn exit_dialogue_block(&mut self) {
        self.in_dialogue_block = false;
        self.expecting_dialogue = false;
    }
}

/// One entry of the ordered classification table
pub struct ClassificationRule {
    pub name: &'static str,
    pub classify: fn(&str, &ParserState) -> Option<ElementKind>,
}

/// The classification table, in priority order. Blank lines never reach it.
pub static RULES: &[ClassificationRule] = &[
    ClassificationRule { name: "title_page", classify: classify_title_page },
    ClassificationRule { name: "effect_cue", classify: classify_effect_cue },
    ClassificationRule { name: "page_break", classify: classify_page_break },
    ClassificationRule { name: "scene_heading", classify: classify_scene_heading },
    ClassificationRule { name: "shot", classify: classify_shot },
    ClassificationRule { name: "transition", classify: classify_transition },
    ClassificationRule { name: "montage", classify: classify_montage },
    ClassificationRule { name: "title", classify: classify_title },
    ClassificationRule { name: "parenthetical", classify: classify_parenthetical },
    ClassificationRule { name: "dual_dialogue", classify: classify_dual_dialogue },
    ClassificationRule { name: "character", classify: classify_character },
    ClassificationRule { name: "dialogue", classify: classify_dialogue },
];

fn classify_title_page(text: &str, state: &ParserState) -> Option<ElementKind> {
    if !state.in_title_page {
        return None;
    }
    if TITLE_PAGE_TITLE_REGEX.is_match(text) {
        Some(ElementKind::TitlePageTitle)
    } else if TITLE_PAGE_AUTHOR_REGEX.is_match(text) {
        Some(ElementKind::TitlePageAuthor)
    } else if TITLE_PAGE_CONTACT_REGEX.is_match(text) {
        Some(ElementKind::TitlePageContact)
    } else if TITLE_PAGE_CREDIT_REGEX.is_match(text) {
        Some(ElementKind::TitlePageCredit)
    } else if state.last_nonblank_kind == Some(ElementKind::TitlePageCredit)
        && !SCENE_HEADING_REGEX.is_match(text)
        && !TRANSITION_REGEX.is_match(text)
    {
        // The name line under "Written by"; headings and transitions still end the title page.
        Some(ElementKind::TitlePageAuthor)
    } else {
        None
    }
}

fn classify_effect_cue(text: &str, _state: &ParserState) -> Option<ElementKind> {
    BRACKETED_REGEX.is_match(text).then_some(ElementKind::EffectCue)
}

fn classify_page_break(text: &str, _state: &ParserState) -> Option<ElementKind> {
    if PAGE_BREAK_REGEX.is_match(text) {
        Some(ElementKind::PageBreak)
    } else if MORE_REGEX.is_match(text) {
        Some(ElementKind::More)
    } else {
        None
    }
}

fn classify_scene_heading(text: &str, _state: &ParserState) -> Option<ElementKind> {
    SCENE_HEADING_REGEX.is_match(text).then_some(ElementKind::SceneHeading)
}

fn classify_shot(text: &str, _state: &ParserState) -> Option<ElementKind> {
    SHOT_REGEX.is_match(text).then_some(ElementKind::Shot)
}

fn classify_transition(text: &str, _state: &ParserState) -> Option<ElementKind> {
    TRANSITION_REGEX.is_match(text).then_some(ElementKind::Transition)
}

fn classify_montage(text: &str, _state: &ParserState) -> Option<ElementKind> {
    if MONTAGE_BEGIN_REGEX.is_match(text) {
        Some(ElementKind::MontageBegin)
    } else if MONTAGE_END_REGEX.is_match(text) {
        Some(ElementKind::MontageEnd)
    } else {
        None
    }
}

fn classify_title(text: &str, _state: &ParserState) -> Option<ElementKind> {
    TITLE_REGEX.is_match(text).then_some(ElementKind::Title)
}

fn classify_parenthetical(text: &str, state: &ParserState) -> Option<ElementKind> {
    (state.in_dialogue_block && PARENTHETICAL_REGEX.is_match(text))
        .then_some(ElementKind::Parenthetical)
}

fn classify_dual_dialogue(text: &str, _state: &ParserState) -> Option<ElementKind> {
    let name = text.strip_prefix(DUAL_DIALOGUE_MARKER)?.trim();
    is_character_name(name).then_some(ElementKind::DualDialogueCharacter)
}

fn classify_character(text: &str, _state: &ParserState) -> Option<ElementKind> {
    is_character_name(text).then_some(ElementKind::Character)
}

fn classify_dialogue(text: &str, state: &ParserState) -> Option<ElementKind> {
    if !(state.expecting_dialogue || state.in_dialogue_block) {
        return None;
    }
    (!is_all_caps(text) && !PARENTHETICAL_REGEX.is_match(text)).then_some(ElementKind::Dialogue)
}

/// Permissive character-cue heuristic; the post-processor repairs its
/// false positives.
pub fn is_character_name(text: &str) -> bool {
    let name = base_character_name(text);
    if name.is_empty() || !is_all_caps(&name) {
        return false;
    }
    if name.split_whitespace().count() > MAX_CUE_WORDS {
        return false;
    }
    if SCENE_HEADING_REGEX.is_match(text) || TRANSITION_REGEX.is_match(text) {
        return false;
    }
    name.chars().count() < MAX_CUE_LENGTH
}

/// Classify one cleaned, non-empty line against the current state.
pub fn classify_line(text: &str, state: &ParserState) -> ElementKind {
    for rule in RULES {
        if let Some(kind) = (rule.classify)(text, state) {
            trace!("Rule '{}' classified '{}' as {}", rule.name, text, kind);
            return kind;
        }
    }
    ElementKind::Action
}

/// Build the element for one raw line. Blank lines yield `Blank` with
/// empty text.
pub fn classify(raw_line: &str, cleaned: &str, line_number: usize, state: &ParserState) -> ScreenplayElement {
    if cleaned.is_empty() {
        return ScreenplayElement::new(ElementKind::Blank, "", line_number).with_raw(raw_line);
    }

    let kind = classify_line(cleaned, state);
    let text = if kind == ElementKind::DualDialogueCharacter {
        cleaned.trim_start_matches(DUAL_DIALOGUE_MARKER).trim()
    } else {
        cleaned
    };

    ScreenplayElement::new(kind, text, line_number).with_raw(raw_line)
}
