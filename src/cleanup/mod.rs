/*!
 * Optional passes over a parsed screenplay: character name unification and
 * meta-comment removal.
 */

pub mod characters;
pub mod meta_comments;

pub use characters::{CharacterNameUnifier, CharacterVariant};
pub use meta_comments::{MetaCommentRemover, RemovedComment};
