/*!
 * Integration tests for the formatting workflow: read, parse, clean, render
 */

use anyhow::Result;

use screenplay_formatter::cleanup::{CharacterNameUnifier, MetaCommentRemover};
use screenplay_formatter::compare::{Difference, compare};
use screenplay_formatter::file_utils::FileManager;
use screenplay_formatter::render::{Renderer, TextRenderer};
use screenplay_formatter::{ElementKind, parse, validate};

use crate::common;

/// Format a messy draft file into a clean, rendered screenplay file
#[test]
fn test_formatWorkflow_withMessyDraft_shouldRenderCleanScript() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "draft.txt", common::MESSY_SCREENPLAY)?;
    let output = temp_dir.path().join("script.txt");

    // 1. Read and parse
    let elements = parse(&FileManager::read_screenplay(&input)?);

    // 2. Clean up
    let elements = MetaCommentRemover::new().remove(&elements);
    let elements = CharacterNameUnifier::new().unify(&elements);

    // 3. Render
    TextRenderer::new().write_to(&elements, &output)?;
    let rendered = FileManager::read_to_string(&output)?;

    assert!(rendered.starts_with("INT. LAB - NIGHT\n"));
    assert!(!rendered.contains("SUNSET PROJECT"));
    assert!(!rendered.contains("[NOTE"));
    assert!(!rendered.contains("JESS\n"));
    assert!(rendered.lines().any(|l| l.trim() == "JESSICA"));

    // 4. Cleanup resolved everything the validator complained about
    let report = validate(&elements, false);
    assert!(report.passed, "{}", report.to_text());
    Ok(())
}

/// Rendering keeps every element in its column
#[test]
fn test_formatWorkflow_renderedCleanScreenplay_shouldUseStandardColumns() {
    let rendered = TextRenderer::new().render(&parse(common::CLEAN_SCREENPLAY));
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "INT. COFFEE SHOP - DAY");
    assert!(lines.contains(&"John sips his coffee."));
    assert!(lines.iter().any(|l| l.starts_with(&" ".repeat(31)) && l.trim() == "(quietly)"));
    assert!(lines.iter().any(|l| l.starts_with(&" ".repeat(25)) && l.trim() == "This is good."));
    let transition = lines.last().unwrap();
    assert_eq!(transition.len(), 70);
    assert!(lines.iter().all(|l| l.chars().count() <= 80));
}

/// Diffing a draft against its cleaned version only reports the edited lines
#[test]
fn test_diffWorkflow_shouldReportContentEdits() {
    let original = parse(common::MESSY_SCREENPLAY);
    let cleaned = CharacterNameUnifier::new().unify(&original);

    let differences = compare(&original, &cleaned);
    assert_eq!(differences.len(), 1);
    assert!(matches!(
        &differences[0],
        Difference::ContentMismatch { input, reference, .. } if input == "JESS" && reference == "JESSICA"
    ));
    assert!(compare(&cleaned, &cleaned).is_empty());
    assert!(original.iter().any(|e| e.kind == ElementKind::Parenthetical));
}
