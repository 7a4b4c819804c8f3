//! TODO marker scanning and ordering rules for exercise sources
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// A line comment whose text starts with `TODO`. Prose that merely mentions
/// a TODO ("work on TODO 1 before this") is not a marker.
static TODO_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*//+\s*TODO\b(?:\s+(\d+))?").expect("TODO pattern is valid")
});

/// Scanning stops at the first line containing this, so test-section
/// references like "TODO 3 tests" are not mistaken for work items.
const TEST_SECTION: &str = "#[cfg(test)]";

/// A `TODO` found in a source file. `line` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TodoMarker {
    pub line: usize,
    pub number: Option<u32>,
}

/// Collect TODO markers that appear before the test section.
pub fn scan_todos(source: &str) -> Vec<TodoMarker> {
    let mut markers = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if line.contains(TEST_SECTION) {
            break;
        }
        if let Some(caps) = TODO_MARKER.captures(line) {
            let number = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            markers.push(TodoMarker {
                line: idx + 1,
                number,
            });
        }
    }
    markers
}

/// Highest TODO number in `markers`.
pub fn todo_count(markers: &[TodoMarker]) -> u32 {
    markers.iter().filter_map(|m| m.number).max().unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TodoOrderViolation {
    DoesNotStartAtOne { line: usize, number: u32 },
    OutOfOrder { line: usize, number: u32, previous: u32 },
    Gap { line: usize, number: u32, expected: u32 },
}

impl fmt::Display for TodoOrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TodoOrderViolation::DoesNotStartAtOne { line, number } => {
                write!(f, "line {}: first TODO is {}, expected 1", line, number)
            }
            TodoOrderViolation::OutOfOrder {
                line,
                number,
                previous,
            } => write!(f, "line {}: TODO {} appears after TODO {}", line, number, previous),
            TodoOrderViolation::Gap {
                line,
                number,
                expected,
            } => write!(f, "line {}: TODO {} skips TODO {}", line, number, expected),
        }
    }
}

/// Numbered markers must read 1, 2, 3, ... in file order. A number may
/// repeat while a step spans several places, but never go back or skip.
/// Unnumbered markers are ignored.
pub fn check_todo_order(markers: &[TodoMarker]) -> Result<(), TodoOrderViolation> {
    let mut highest = 0u32;
    for marker in markers {
        let Some(number) = marker.number else {
            continue;
        };

        if number < highest {
            return Err(TodoOrderViolation::OutOfOrder {
                line: marker.line,
                number,
                previous: highest,
            });
        }
        if number > highest + 1 {
            return Err(if highest == 0 {
                TodoOrderViolation::DoesNotStartAtOne {
                    line: marker.line,
                    number,
                }
            } else {
                TodoOrderViolation::Gap {
                    line: marker.line,
                    number,
                    expected: highest + 1,
                }
            });
        }
        highest = number;
    }
    Ok(())
}

/// The leading `//!` block of a source file: the exercise's intent and
/// sample output.
pub fn header_doc(source: &str) -> String {
    source
        .lines()
        .map(str::trim_start)
        .skip_while(|line| line.is_empty())
        .take_while(|line| line.starts_with("//!"))
        .map(|line| {
            let text = &line[3..];
            text.strip_prefix(' ').unwrap_or(text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKELETON: &str = "//! # Billcoin\n\
//!\n\
//! Work through the TODOs.\n\
\n\
fn verify() {\n\
    // TODO 1\n\
    // TODO 1\n\
    // TODO 2\n\
    // TODO: tidy this up\n\
}\n\
\n\
#[cfg(test)]\n\
mod tests {\n\
    // TODO 1 tests\n\
}\n";

    #[test]
    fn test_scan_stops_at_test_section() {
        let markers = scan_todos(SKELETON);
        let numbers: Vec<_> = markers.iter().map(|m| m.number).collect();
        // The header mentions "TODOs", which is not a marker
        assert_eq!(numbers, vec![Some(1), Some(1), Some(2), None]);
        assert_eq!(markers[0].line, 6);
        assert_eq!(todo_count(&markers), 2);
    }

    #[test]
    fn test_repeated_numbers_are_in_order() {
        assert!(check_todo_order(&scan_todos(SKELETON)).is_ok());
        assert!(check_todo_order(&[]).is_ok());
    }

    #[test]
    fn test_out_of_order_is_reported() {
        let markers = scan_todos("// TODO 1\n// TODO 2\n// TODO 1\n");
        assert_eq!(
            check_todo_order(&markers),
            Err(TodoOrderViolation::OutOfOrder {
                line: 3,
                number: 1,
                previous: 2
            })
        );
    }

    #[test]
    fn test_gap_is_reported() {
        let markers = scan_todos("// TODO 1\n// TODO 3\n");
        let err = check_todo_order(&markers).unwrap_err();
        assert_eq!(err.to_string(), "line 2: TODO 3 skips TODO 2");
    }

    #[test]
    fn test_must_start_at_one() {
        let markers = scan_todos("// TODO 2\n");
        assert!(matches!(
            check_todo_order(&markers),
            Err(TodoOrderViolation::DoesNotStartAtOne { number: 2, .. })
        ));
    }

    #[test]
    fn test_mentions_inside_a_step_are_not_markers() {
        let source = "\
fn main() {
    // TODO 1
    // TODO 2
    // TODO 3
    // TODO 4
    // Sign the message.
    //         I recommend you work on TODO 1 before this.
    let sig = sign(); // see TODO 2
    //           I recommend you work on TODO 3 before this.
    // TODO 5
}
";
        let markers = scan_todos(source);
        let numbers: Vec<_> = markers.iter().filter_map(|m| m.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(markers.last().map(|m| m.line), Some(10));
        assert!(check_todo_order(&markers).is_ok());
    }

    #[test]
    fn test_header_doc() {
        assert_eq!(header_doc(SKELETON), "# Billcoin\n\nWork through the TODOs.");
        assert_eq!(header_doc("fn main() {}\n"), "");
    }
}
