/*!
 * Prompts for the screenplay corrector.
 *
 * The system prompt fixes the corrector's role and limits; the user prompt
 * carries the style guide, the detected error codes, the chunk text and the
 * response schema.
 */

use sha2::{Digest, Sha256};

use super::chunker::Chunk;

/// Role and limits of the corrector
pub const SYSTEM_PROMPT: &str = r#"You are a screenplay formatting corrector. You must enforce industry formatting rules without inventing story content.

ALLOWED: capitalization, whitespace/indentation normalization; moving lines between blocks; adding missing INT./EXT./TIME only when unambiguous.
FORBIDDEN: adding words/lines/characters; rewriting dialogue; creative changes.

If uncertain, output a suggestion with low confidence rather than altering the text.
Output strictly as JSON matching the provided schema. No prose."#;

const STYLE_GUIDE: &str = r#"STYLE_GUIDE (per industry standards):
- Scene headings: ALL CAPS: INT./EXT. + SPECIFIC LOCATION + TIME (DAY/NIGHT/EVENING/CONTINUOUS/LATER).
- Character names: ALL CAPS, centered.
- Dialogue: Standard capitalization, indented under the character name.
- Parentheticals: Under character name, in parentheses (angrily), (O.S.), (V.O.).
- Transitions: ALL CAPS, flush right (FADE IN:, FADE OUT., CUT TO:, DISSOLVE TO:, SMASH TO:).
- Action lines: Present tense, first character mention in ALL CAPS, short paragraphs (3-4 lines max).
- Dialogue blocks never break across pages. Keep character names with their dialogue.

REMOVE THESE NON-SCREENPLAY ELEMENTS:
- File headers (project names, export timestamps, version info)
- Metadata lines (Exported:, Generated:, Created:, Version:)
- Separator lines (======, ------, ******, ####)
- Act/scene numbers that are not part of screenplay format (ACT 1, SCENE 1)
- Bracketed production notes ([TODO: ...], [NOTE: ...])"#;

const RESPONSE_SCHEMA: &str = r#"{
  "version": "1.0",
  "model": "model_name",
  "fixes": [
    {
      "start_line": 0,
      "end_line": 0,
      "original": ["original line"],
      "revised": ["corrected line"],
      "issues": ["E1", "E2"],
      "confidence": 0.9
    }
  ],
  "unchanged_lines": [1, 2, 3],
  "notes": "Brief explanation"
}"#;

/// Builds the prompt pair for one chunk
#[derive(Debug, Clone, Default)]
pub struct CorrectionPromptBuilder {
    error_codes: Vec<String>,
    chunk_text: String,
    custom_instructions: Option<String>,
}

impl CorrectionPromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the lines and findings of a chunk.
    pub fn with_chunk(mut self, chunk: &Chunk) -> Self {
        self.error_codes = chunk.error_codes().into_iter().map(str::to_string).collect();
        self.chunk_text = chunk.text();
        self
    }

    pub fn with_custom_instructions(mut self, instructions: &str) -> Self {
        self.custom_instructions = Some(instructions.to_string());
        self
    }

    pub fn build_system_prompt(&self) -> String {
        SYSTEM_PROMPT.to_string()
    }

    pub fn build_user_prompt(&self) -> String {
        let mut prompt = String::with_capacity(STYLE_GUIDE.len() + self.chunk_text.len() + 1024);
        prompt.push_str(STYLE_GUIDE);
        prompt.push_str("\n\nDETECTED_ISSUES: ");
        prompt.push_str(&self.error_codes.join(", "));
        prompt.push_str("\n\nINPUT_CHUNK:\n<<<\n");
        prompt.push_str(&self.chunk_text);
        prompt.push_str("\n>>>\n\n");

        if let Some(instructions) = &self.custom_instructions {
            prompt.push_str("ADDITIONAL_INSTRUCTIONS:\n");
            prompt.push_str(instructions);
            prompt.push_str("\n\n");
        }

        prompt.push_str(
            "TASK:\nIdentify formatting issues, propose minimal fixes, and return JSON with the following schema.\n\
             Line indices are 0-based within INPUT_CHUNK and end_line is inclusive.\n",
        );
        prompt.push_str(RESPONSE_SCHEMA);
        prompt
    }

    /// Build both system and user prompts.
    pub fn build(&self) -> (String, String) {
        (self.build_system_prompt(), self.build_user_prompt())
    }
}

/// First 8 hex characters of the SHA-256 of a prompt
pub fn fingerprint(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    digest.iter().take(4).map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screenplay::{ElementKind, ScreenplayElement};
    use crate::validation::{ErrorCode, ValidationFinding};

    fn sample_chunk() -> Chunk {
        let element = ScreenplayElement::new(ElementKind::Character, "john", 1);
        Chunk {
            start_line: 0,
            end_line: 1,
            lines: vec!["john".to_string(), "Hello.".to_string()],
            findings: vec![ValidationFinding::new(&element, ErrorCode::CharacterNotCaps, "not caps", 0.95)],
            elements: vec![element],
        }
    }

    #[test]
    fn test_buildUserPrompt_shouldEmbedChunkAndCodes() {
        let prompt = CorrectionPromptBuilder::new().with_chunk(&sample_chunk()).build_user_prompt();

        assert!(prompt.starts_with("STYLE_GUIDE"));
        assert!(prompt.contains("DETECTED_ISSUES: E2"));
        assert!(prompt.contains("<<<\njohn\nHello.\n>>>"));
        assert!(prompt.contains("\"unchanged_lines\""));
        assert!(!prompt.contains("ADDITIONAL_INSTRUCTIONS"));
    }

    #[test]
    fn test_build_withCustomInstructions_shouldIncludeThem() {
        let (system, user) = CorrectionPromptBuilder::new()
            .with_chunk(&sample_chunk())
            .with_custom_instructions("Keep British spelling.")
            .build();

        assert!(system.contains("FORBIDDEN"));
        assert!(user.contains("ADDITIONAL_INSTRUCTIONS:\nKeep British spelling."));
    }

    #[test]
    fn test_fingerprint_shouldBeStableEightHexChars() {
        let a = fingerprint("prompt");
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, fingerprint("prompt"));
        assert_ne!(a, fingerprint("prompt2"));
    }
}
