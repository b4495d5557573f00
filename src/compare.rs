/*!
 * Structural comparison of two parsed screenplays.
 */

use std::fmt;

use crate::screenplay::{ElementKind, ScreenplayElement};

/// One positional difference between two parses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// Present in the reference only
    Missing { position: usize },
    /// Present in the input only
    Extra { position: usize },
    KindMismatch { position: usize, input: ElementKind, reference: ElementKind },
    ContentMismatch { position: usize, input: String, reference: String },
}

impl Difference {
    /// 1-based element position
    pub fn position(&self) -> usize {
        match self {
            Difference::Missing { position }
            | Difference::Extra { position }
            | Difference::KindMismatch { position, .. }
            | Difference::ContentMismatch { position, .. } => *position,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Missing { position } => write!(f, "Line {}: Missing in input", position),
            Difference::Extra { position } => write!(f, "Line {}: Extra in input", position),
            Difference::KindMismatch { position, input, reference } => {
                write!(f, "Line {}: Type mismatch ({} vs {})", position, input, reference)
            }
            Difference::ContentMismatch { position, input, reference } => {
                write!(f, "Line {}: Content mismatch ('{}' vs '{}')", position, input, reference)
            }
        }
    }
}

/// Compare element by element. A kind mismatch hides any content mismatch
/// at the same position.
pub fn compare(input: &[ScreenplayElement], reference: &[ScreenplayElement]) -> Vec<Difference> {
    let len = input.len().max(reference.len());
    let mut differences = Vec::new();

    for i in 0..len {
        let position = i + 1;
        match (input.get(i), reference.get(i)) {
            (None, Some(_)) => differences.push(Difference::Missing { position }),
            (Some(_), None) => differences.push(Difference::Extra { position }),
            (Some(a), Some(b)) if a.kind != b.kind => differences.push(Difference::KindMismatch {
                position,
                input: a.kind,
                reference: b.kind,
            }),
            (Some(a), Some(b)) if a.text != b.text => differences.push(Difference::ContentMismatch {
                position,
                input: a.text.clone(),
                reference: b.text.clone(),
            }),
            _ => {}
        }
    }

    differences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screenplay::ScreenplayParser;

    #[test]
    fn test_compare_identicalParses_shouldBeEmpty() {
        let parser = ScreenplayParser::new();
        let a = parser.parse("INT. A - DAY\n\nJOHN\nHi.");
        assert!(compare(&a, &a.clone()).is_empty());
    }

    #[test]
    fn test_compare_shouldReportEachKindOfDifference() {
        let parser = ScreenplayParser::new();
        let input = parser.parse("INT. A - DAY\nRain falls.\nJOHN");
        let reference = parser.parse("INT. A - DAY\nSnow falls.\nCUT TO:\nTHE END");

        let diffs = compare(&input, &reference);
        assert_eq!(diffs.len(), 3);
        assert!(matches!(diffs[0], Difference::ContentMismatch { position: 2, .. }));
        assert!(matches!(
            diffs[1],
            Difference::KindMismatch { position: 3, input: ElementKind::Character, reference: ElementKind::Transition }
        ));
        assert_eq!(diffs[2], Difference::Missing { position: 4 });
        assert_eq!(diffs[2].to_string(), "Line 4: Missing in input");
    }
}
