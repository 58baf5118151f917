//! Substring search with global line-number annotation

use super::Operation;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Case-sensitive literal substring search. No regex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOp {
    pub term: String,
}

/// A matching line, annotated with its 1-based position in the whole
/// dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub line_number: usize,
    pub text: String,
}

impl Operation for SearchOp {
    type Partial = Vec<MatchRecord>;

    fn apply(&self, lines: &[String], global_offset: usize) -> Self::Partial {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.contains(&self.term))
            .map(|(local_index, line)| MatchRecord {
                line_number: global_offset + local_index + 1,
                text: line.clone(),
            })
            .collect()
    }

    fn identity(&self) -> Self::Partial {
        Vec::new()
    }

    // Chunks are disjoint ordered sub-ranges dispatched in increasing
    // index order, so concatenating partials in worker-index order is
    // already globally sorted. No extra sort.
    fn combine(&self, mut acc: Self::Partial, next: Self::Partial) -> Self::Partial {
        acc.extend(next);
        acc
    }

    fn render(&self, partial: Self::Partial) -> String {
        let mut out = String::new();
        for record in partial {
            let _ = writeln!(out, "{} : {}", record.line_number, record.text);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apply_reports_global_line_numbers() {
        let op = SearchOp {
            term: "Alice".to_string(),
        };
        let matches = op.apply(&lines(&["Alice, 111", "Bob, 222", "Alice, 333"]), 0);
        assert_eq!(
            matches,
            vec![
                MatchRecord {
                    line_number: 1,
                    text: "Alice, 111".to_string()
                },
                MatchRecord {
                    line_number: 3,
                    text: "Alice, 333".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_apply_offsets_into_later_chunks() {
        let op = SearchOp {
            term: "x".to_string(),
        };
        let matches = op.apply(&lines(&["x", "y", "ax"]), 100);
        assert_eq!(matches[0].line_number, 101);
        assert_eq!(matches[1].line_number, 103);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let op = SearchOp {
            term: "alice".to_string(),
        };
        assert!(op.apply(&lines(&["Alice"]), 0).is_empty());
    }

    #[test]
    fn test_empty_chunk_yields_identity() {
        let op = SearchOp {
            term: "a".to_string(),
        };
        assert_eq!(op.apply(&[], 5), op.identity());
    }

    #[test]
    fn test_combine_preserves_order() {
        let op = SearchOp {
            term: "a".to_string(),
        };
        let first = op.apply(&lines(&["a1", "a2"]), 0);
        let second = op.apply(&lines(&["a3"]), 2);
        let merged = op.combine(first, second);
        let numbers: Vec<usize> = merged.iter().map(|m| m.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_render_format() {
        let op = SearchOp {
            term: "Alice".to_string(),
        };
        let partial = op.apply(&lines(&["Alice, 111", "Bob, 222", "Alice, 333"]), 0);
        assert_eq!(op.render(partial), "1 : Alice, 111\n3 : Alice, 333\n");
    }
}
