/*!
 * Screenplay element model.
 *
 * Every input line becomes exactly one `ScreenplayElement` carrying its
 * classification, cleaned text and 1-based source line.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use super::patterns::{CHARACTER_EXTENSIONS, DUAL_DIALOGUE_MARKER};

/// Kind of a screenplay line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    SceneHeading,
    Action,
    Character,
    Dialogue,
    Parenthetical,
    Transition,
    Shot,
    DualDialogueCharacter,
    MontageBegin,
    MontageEnd,
    Title,
    PageBreak,
    TitlePageTitle,
    TitlePageAuthor,
    TitlePageContact,
    TitlePageCredit,
    EffectCue,
    More,
    Blank,
    /// Catch-all for kinds this build does not know about
    #[serde(other)]
    Unknown,
}

impl ElementKind {
    /// Stable upper-case name used in reports and serialized output
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::SceneHeading => "SCENE_HEADING",
            ElementKind::Action => "ACTION",
            ElementKind::Character => "CHARACTER",
            ElementKind::Dialogue => "DIALOGUE",
            ElementKind::Parenthetical => "PARENTHETICAL",
            ElementKind::Transition => "TRANSITION",
            ElementKind::Shot => "SHOT",
            ElementKind::DualDialogueCharacter => "DUAL_DIALOGUE_CHARACTER",
            ElementKind::MontageBegin => "MONTAGE_BEGIN",
            ElementKind::MontageEnd => "MONTAGE_END",
            ElementKind::Title => "TITLE",
            ElementKind::PageBreak => "PAGE_BREAK",
            ElementKind::TitlePageTitle => "TITLE_PAGE_TITLE",
            ElementKind::TitlePageAuthor => "TITLE_PAGE_AUTHOR",
            ElementKind::TitlePageContact => "TITLE_PAGE_CONTACT",
            ElementKind::TitlePageCredit => "TITLE_PAGE_CREDIT",
            ElementKind::EffectCue => "EFFECT_CUE",
            ElementKind::More => "MORE",
            ElementKind::Blank => "BLANK",
            ElementKind::Unknown => "UNKNOWN",
        }
    }

    /// Character cue, including the second speaker of a dual dialogue
    pub fn is_character_cue(&self) -> bool {
        matches!(self, ElementKind::Character | ElementKind::DualDialogueCharacter)
    }

    pub fn is_title_page(&self) -> bool {
        matches!(
            self,
            ElementKind::TitlePageTitle
                | ElementKind::TitlePageAuthor
                | ElementKind::TitlePageContact
                | ElementKind::TitlePageCredit
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single classified line of a screenplay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenplayElement {
    /// Classification of the line
    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// Cleaned text, whitespace-trimmed
    pub text: String,

    /// 1-based line number in the input the parser received
    #[serde(rename = "line_number")]
    pub source_line: usize,

    /// The line as it appeared in the input
    #[serde(default)]
    pub raw_text: String,

    /// Sequential scene number, scene headings only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<u32>,
}

impl ScreenplayElement {
    pub fn new(kind: ElementKind, text: impl Into<String>, source_line: usize) -> Self {
        let text = text.into();
        Self {
            kind,
            raw_text: text.clone(),
            text,
            source_line,
            scene_number: None,
        }
    }

    /// Attach the raw input line
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = raw.into();
        self
    }

    pub fn is_blank(&self) -> bool {
        self.kind == ElementKind::Blank
    }

    /// Whether the cue text ends with one of the known extensions
    pub fn has_extension(&self) -> bool {
        let upper = self.text.to_uppercase();
        CHARACTER_EXTENSIONS.iter().any(|ext| upper.ends_with(ext))
    }

    /// Speaker name of a cue without dual marker, extensions or trailing colon.
    pub fn character_name(&self) -> Option<String> {
        if !self.kind.is_character_cue() {
            return None;
        }
        let name = base_character_name(&self.text);
        if name.is_empty() { None } else { Some(name) }
    }
}

/// Strip the dual-dialogue marker, cue extensions and a trailing colon from a cue.
pub fn base_character_name(text: &str) -> String {
    let mut name = text.trim().trim_start_matches(DUAL_DIALOGUE_MARKER).trim().to_string();

    loop {
        let upper = name.to_uppercase();
        let Some(ext) = CHARACTER_EXTENSIONS.iter().find(|ext| upper.ends_with(*ext)) else {
            break;
        };
        let cut = name.len() - ext.len();
        if !name.is_char_boundary(cut) {
            break;
        }
        name.truncate(cut);
        name = name.trim_end().to_string();
    }

    name.trim_end_matches(':').trim().to_string()
}
