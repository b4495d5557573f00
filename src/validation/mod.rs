/*!
 * Validation of parsed screenplays against formatting conventions.
 *
 * # Architecture
 *
 * - `structure`: scene headings, cue casing, block order, parentheticals, transitions
 * - `content`: meta-comments, casual language, redundancy, action in parentheticals
 * - `characters`: character name consistency
 * - `findings`: error codes, findings and the report
 * - `service`: the rule registry and runner
 */

pub mod characters;
pub mod content;
pub mod findings;
pub mod service;
pub mod structure;

// Re-export main types
pub use findings::{ErrorCode, ValidationFinding, ValidationReport};
pub use service::{ValidationConfig, ValidationRule, ValidationService};
