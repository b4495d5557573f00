/*!
 * Tests for character unification and meta-comment removal on parsed drafts
 */

use screenplay_formatter::cleanup::{CharacterNameUnifier, MetaCommentRemover};
use screenplay_formatter::{ElementKind, ErrorCode, parse, validate};

use crate::common;

#[test]
fn test_unifier_onMessyDraft_shouldMergeJessVariants() {
    let elements = parse(common::MESSY_SCREENPLAY);
    let mut unifier = CharacterNameUnifier::new();
    unifier.analyze(&elements);

    let inconsistent = unifier.inconsistent();
    assert_eq!(inconsistent.len(), 1);
    assert_eq!(inconsistent[0].canonical, "JESSICA");

    let unified = unifier.unify(&elements);
    let cues: Vec<&str> = unified
        .iter()
        .filter(|e| e.kind == ElementKind::Character)
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(cues, vec!["JESSICA", "JESSICA"]);
    assert_eq!(unified.len(), elements.len());
}

#[test]
fn test_remover_onMessyDraft_shouldClearMetaCommentFinding() {
    let elements = parse(common::MESSY_SCREENPLAY);
    assert!(MetaCommentRemover::has_meta_comments(&elements));

    let mut remover = MetaCommentRemover::new();
    let cleaned = remover.remove(&elements);

    assert_eq!(remover.removed().len(), 1);
    assert_eq!(remover.removed()[0].comment, "[NOTE: tighten this]");
    assert!(cleaned.iter().any(|e| e.text == "Dr. Vance paces."));
    assert_eq!(validate(&cleaned, false).count(ErrorCode::MetaCommentPresent), 0);
}

#[test]
fn test_remover_withoutComments_shouldReport() {
    let mut remover = MetaCommentRemover::new();
    let elements = parse(common::CLEAN_SCREENPLAY);
    assert_eq!(remover.remove(&elements), elements);
    assert_eq!(remover.report(), "No meta-comments found.");
}
