/*!
 * Screenplay parsing.
 *
 * - `patterns`: shared regular expressions and vocabularies
 * - `cleaner`: preamble removal and per-line cleanup
 * - `classifier`: ordered classification rules and parser state
 * - `post_process`: neighbour-based repairs and scene numbering
 * - `parser`: the pipeline tying these together
 * - `element`: the element model
 */

pub mod classifier;
pub mod cleaner;
pub mod element;
pub mod parser;
pub mod patterns;
pub mod post_process;

pub use classifier::ParserState;
pub use element::{ElementKind, ScreenplayElement};
pub use parser::ScreenplayParser;
