/*!
 * Second pass over a classified sequence.
 *
 * Repairs local misclassifications using one neighbour of context and
 * numbers scene headings. The pass runs once; chains of misclassified lines
 * are left as they are.
 */

use log::debug;

use super::element::{ElementKind, ScreenplayElement};

fn speaks_before_dialogue(kind: ElementKind) -> bool {
    kind.is_character_cue() || matches!(kind, ElementKind::Parenthetical | ElementKind::Dialogue)
}

fn follows_cue(kind: ElementKind) -> bool {
    matches!(kind, ElementKind::Dialogue | ElementKind::Parenthetical | ElementKind::Blank)
}

/// Apply the corrective pass in place.
///
/// Dialogue is checked against the already-corrected predecessor, cues
/// against the not-yet-corrected successor.
pub fn post_process(elements: &mut [ScreenplayElement]) {
    let mut repaired = 0usize;

    for i in 0..elements.len() {
        if elements[i].kind == ElementKind::Dialogue && i > 0 {
            if !speaks_before_dialogue(elements[i - 1].kind) {
                debug!("Line {}: dialogue without a speaker, reclassified as action", elements[i].source_line);
                elements[i].kind = ElementKind::Action;
                repaired += 1;
            }
        }

        if elements[i].kind == ElementKind::Character && i + 1 < elements.len() {
            if !follows_cue(elements[i + 1].kind) && !elements[i].has_extension() {
                debug!("Line {}: cue without dialogue, reclassified as action", elements[i].source_line);
                elements[i].kind = ElementKind::Action;
                repaired += 1;
            }
        }
    }

    number_scenes(elements);

    if repaired > 0 {
        debug!("Post-processing repaired {} element(s)", repaired);
    }
}

/// Assign 1-based scene numbers to scene headings, in order.
pub fn number_scenes(elements: &mut [ScreenplayElement]) {
    let mut counter = 0u32;
    for element in elements.iter_mut() {
        if element.kind == ElementKind::SceneHeading {
            counter += 1;
            element.scene_number = Some(counter);
        } else {
            element.scene_number = None;
        }
    }
}
