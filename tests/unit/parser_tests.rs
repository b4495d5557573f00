/*!
 * Tests for the screenplay parser
 */

use screenplay_formatter::screenplay::cleaner::clean_text;
use screenplay_formatter::{ElementKind, ScreenplayElement, parse};

use crate::common;

fn kinds(elements: &[ScreenplayElement]) -> Vec<ElementKind> {
    elements.iter().map(|e| e.kind).collect()
}

/// One element per cleaned line, blanks included
#[test]
fn test_parse_withPreamble_shouldEmitOneElementPerCleanedLine() {
    let elements = parse(common::MESSY_SCREENPLAY);
    let cleaned = clean_text(common::MESSY_SCREENPLAY);

    assert_eq!(elements.len(), cleaned.split('\n').count());
    assert_eq!(elements[0].kind, ElementKind::SceneHeading);
    assert_eq!(elements[0].text, "INT. LAB - NIGHT");
    assert_eq!(elements[0].source_line, 1);
}

#[test]
fn test_parse_cleanScreenplay_shouldClassifyEveryLine() {
    let elements = parse(common::CLEAN_SCREENPLAY);

    assert_eq!(
        kinds(&elements),
        vec![
            ElementKind::SceneHeading,
            ElementKind::Blank,
            ElementKind::Action,
            ElementKind::Blank,
            ElementKind::Character,
            ElementKind::Parenthetical,
            ElementKind::Dialogue,
            ElementKind::Blank,
            ElementKind::Transition,
        ]
    );
}

#[test]
fn test_parse_sceneNumbers_shouldIncreaseWithoutGaps() {
    let text = "INT. A - DAY\n\nAction.\n\nEXT. B - NIGHT\n\nMore.\n\nINT. C - DAY";
    let numbers: Vec<u32> = parse(text).iter().filter_map(|e| e.scene_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_parse_withEmptyText_shouldReturnEmptySequence() {
    assert!(parse("").is_empty());
}

#[test]
fn test_parse_sameInputTwice_shouldBeIdentical() {
    assert_eq!(parse(common::MESSY_SCREENPLAY), parse(common::MESSY_SCREENPLAY));
}

#[test]
fn test_parse_headingAfterCredit_shouldEndTitlePage() {
    let elements = parse("Written by\nINT. HOUSE - DAY\n\nJOHN\nHello there.");

    assert_eq!(elements[0].kind, ElementKind::TitlePageCredit);
    assert_eq!(elements[1].kind, ElementKind::SceneHeading);
    assert_eq!(elements[1].scene_number, Some(1));
    assert_eq!(elements[3].kind, ElementKind::Character);
    assert_eq!(elements[4].kind, ElementKind::Dialogue);
}

#[test]
fn test_parse_transitionAfterCredit_shouldEndTitlePage() {
    let elements = parse("TITLE: Night Shift\nby\nFADE IN:\n\nINT. HOUSE - DAY");

    assert_eq!(
        kinds(&elements),
        vec![
            ElementKind::TitlePageTitle,
            ElementKind::TitlePageCredit,
            ElementKind::Transition,
            ElementKind::Blank,
            ElementKind::SceneHeading,
        ]
    );
}

#[test]
fn test_parse_titlePage_shouldKeepAuthorUnderCredit() {
    let elements = parse("TITLE: Night Shift\nWritten by\nJane Roe\n\nINT. HOUSE - DAY\n\nTITLE: Later");

    assert_eq!(elements[2].kind, ElementKind::TitlePageAuthor);
    assert_eq!(elements[4].kind, ElementKind::SceneHeading);
    assert_eq!(elements[6].kind, ElementKind::Title);
}

#[test]
fn test_parse_onSeveralThreads_shouldMatchSequentialResult() {
    let inputs = [common::CLEAN_SCREENPLAY, common::MESSY_SCREENPLAY, common::BROKEN_HEADING_SCREENPLAY];
    let expected: Vec<_> = inputs.iter().map(|text| parse(text)).collect();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let text = inputs[i % inputs.len()];
            std::thread::spawn(move || (i % inputs.len(), parse(text)))
        })
        .collect();

    for handle in handles {
        let (index, elements) = handle.join().unwrap();
        assert_eq!(elements, expected[index]);
    }
}
