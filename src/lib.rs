/*!
 * # Screenplay Formatter
 *
 * A Rust library for turning messy screenplay drafts into structured,
 * industry-formatted screenplays.
 *
 * ## Features
 *
 * - Parse raw text (including chat-exported drafts) into typed elements
 * - Validate against screenplay formatting rules (E1 to E11)
 * - Unify character name variants and strip editorial meta-comments
 * - Render an 80-column plain-text screenplay
 * - Correct failing passages through an OpenAI-compatible model, with
 *   guardrails on what a correction may change
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `screenplay`: Pre-cleaning, line classification and post-processing
 * - `validation`: Rule engine and validation reports
 * - `cleanup`: Character name unification and meta-comment removal
 * - `render`: Output renderers
 * - `compare`: Structural diff of two parses
 * - `correction`: Chunking, prompts, guardrails and the fix engine
 * - `providers`: Correction providers (OpenAI-compatible, mock)
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod cleanup;
pub mod compare;
pub mod correction;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod render;
pub mod screenplay;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use correction::{FixEngine, FixResult};
pub use errors::{AppError, ConfigError, ProviderError};
pub use screenplay::{ElementKind, ScreenplayElement, ScreenplayParser};
pub use validation::{ErrorCode, ValidationConfig, ValidationReport, ValidationService};

/// Parse raw screenplay text into elements.
pub fn parse(text: &str) -> Vec<ScreenplayElement> {
    ScreenplayParser::new().parse(text)
}

/// Validate parsed elements with the baseline rule set.
pub fn validate(elements: &[ScreenplayElement], strict: bool) -> ValidationReport {
    ValidationService::with_config(ValidationConfig::strict(strict)).validate(elements)
}
