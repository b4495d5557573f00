/*!
 * LLM-assisted correction of validation failures.
 *
 * This module contains the pieces of the correction round trip:
 * - `chunker`: groups findings into contiguous line ranges
 * - `prompts`: the instructions sent with each chunk
 * - `guardrails`: decides whether a proposed fix is applied, suggested or rejected
 * - `engine`: drives parse, validate, correct, apply and re-validate
 *
 * The corrector itself sits behind the `Corrector` trait in `providers`.
 */

use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

pub mod chunker;
pub mod engine;
pub mod guardrails;
pub mod prompts;

pub use chunker::{Chunk, ChunkStats, ValidationChunker};
pub use engine::{AppliedFix, AuditLog, FixEngine, FixResult, RejectedFix};
pub use guardrails::{CorrectionPolicy, FixVerdict};

/// Version of the correction response schema
pub const SCHEMA_VERSION: &str = "1.0";

/// Longest accepted `notes` field
const MAX_NOTES_LEN: usize = 200;

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// One proposed replacement of a line range inside a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSpan {
    /// First replaced line, 0-based within the chunk
    pub start_line: usize,

    /// Last replaced line, inclusive
    pub end_line: usize,

    /// The lines as the corrector saw them
    pub original: Vec<String>,

    /// Replacement lines
    pub revised: Vec<String>,

    /// Error codes the fix addresses (`E1`, `E3`, ...)
    #[serde(default)]
    pub issues: Vec<String>,

    pub confidence: f64,
}

/// Structured reply from a corrector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResponse {
    #[serde(default = "default_version")]
    pub version: String,

    /// Model identifier, suffixed with the prompt fingerprint
    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub fixes: Vec<FixSpan>,

    /// Chunk-relative indices left as they were
    #[serde(default)]
    pub unchanged_lines: Vec<usize>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl CorrectionResponse {
    /// A response with no fixes
    pub fn empty(model: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            version: default_version(),
            model: model.into(),
            fixes: Vec::new(),
            unchanged_lines: Vec::new(),
            notes,
        }
    }

    /// Parse and check a JSON payload.
    ///
    /// Confidence values must lie in [0, 1] and spans must not be inverted.
    /// Overlong notes are truncated.
    pub fn from_json(payload: &str) -> Result<Self, ProviderError> {
        let mut response: Self = serde_json::from_str(payload.trim())
            .map_err(|e| ProviderError::ParseError(format!("Invalid correction JSON: {}", e)))?;

        for (index, fix) in response.fixes.iter().enumerate() {
            if !(0.0..=1.0).contains(&fix.confidence) {
                return Err(ProviderError::ParseError(format!(
                    "Fix {} has confidence {} outside [0, 1]",
                    index, fix.confidence
                )));
            }
            if fix.end_line < fix.start_line {
                return Err(ProviderError::ParseError(format!(
                    "Fix {} ends ({}) before it starts ({})",
                    index, fix.end_line, fix.start_line
                )));
            }
        }

        if let Some(notes) = &mut response.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                *notes = notes.chars().take(MAX_NOTES_LEN).collect();
            }
        }

        Ok(response)
    }

    pub fn average_confidence(&self) -> f64 {
        if self.fixes.is_empty() {
            return 0.0;
        }
        self.fixes.iter().map(|f| f.confidence).sum::<f64>() / self.fixes.len() as f64
    }
}
