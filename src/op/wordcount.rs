//! Word-frequency counting with merge-by-addition and top-K truncation

use super::Operation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

/// Which characters count as word characters when tokenizing.
///
/// The stricter `Alphabetic` rule is the default; `Alphanumeric` also
/// accepts digits. Both exist in the wild for this format, so the rule is
/// part of the operation rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRule {
    #[default]
    Alphabetic,
    Alphanumeric,
}

impl TokenRule {
    fn is_word_char(self, c: char) -> bool {
        match self {
            TokenRule::Alphabetic => c.is_alphabetic(),
            TokenRule::Alphanumeric => c.is_alphanumeric(),
        }
    }
}

/// Count lower-cased token frequencies across the chunk.
///
/// `top_k` limits the rendered output to the K most frequent words;
/// `None` (or zero) means all words. Ties are broken by ascending word
/// order so output is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCountOp {
    #[serde(default)]
    pub rule: TokenRule,
    pub top_k: Option<usize>,
}

/// Split `text` into maximal runs of word characters under `rule`,
/// lower-casing as it goes. Delimiters are any non-matching character;
/// empty tokens are never produced.
pub fn tokenize(text: &str, rule: TokenRule) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if rule.is_word_char(c) {
            word.extend(c.to_lowercase());
        } else if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

impl Operation for WordCountOp {
    type Partial = HashMap<String, u64>;

    fn apply(&self, lines: &[String], _global_offset: usize) -> Self::Partial {
        let mut counts = HashMap::new();
        for line in lines {
            for token in tokenize(line, self.rule) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        counts
    }

    fn identity(&self) -> Self::Partial {
        HashMap::new()
    }

    // Merge by addition: commutative and associative, so the result is
    // invariant under the number of workers.
    fn combine(&self, mut acc: Self::Partial, next: Self::Partial) -> Self::Partial {
        for (word, count) in next {
            *acc.entry(word).or_insert(0) += count;
        }
        acc
    }

    fn render(&self, partial: Self::Partial) -> String {
        let mut entries: Vec<(String, u64)> = partial.into_iter().collect();
        // Descending count, ascending word as tie-break.
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(k) = self.top_k {
            if k > 0 {
                entries.truncate(k);
            }
        }

        let mut out = String::new();
        for (word, count) in entries {
            let _ = writeln!(out, "{word} {count}");
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

    fn op(top_k: Option<usize>) -> WordCountOp {
        WordCountOp {
            rule: TokenRule::Alphabetic,
            top_k,
        }
    }

    #[test]
    fn test_tokenize_alphabetic_drops_digits() {
        assert_eq!(tokenize("abc123def", TokenRule::Alphabetic), vec!["abc", "def"]);
    }

    #[test]
    fn test_tokenize_alphanumeric_keeps_digits() {
        assert_eq!(tokenize("abc123def", TokenRule::Alphanumeric), vec!["abc123def"]);
    }

    #[test]
    fn test_tokenize_lowercases_and_skips_empty() {
        assert_eq!(
            tokenize("  Hello,,WORLD! ", TokenRule::Alphabetic),
            vec!["hello", "world"]
        );
        assert!(tokenize("123 456", TokenRule::Alphabetic).is_empty());
    }

    #[test]
    fn test_apply_counts_case_folded() {
        let counts = op(None).apply(&lines(&["Alice", "Bob", "alice"]), 0);
        assert_eq!(counts.get("alice"), Some(&2));
        assert_eq!(counts.get("bob"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_combine_adds_counts() {
        let operation = op(None);
        let a = operation.apply(&lines(&["x y x"]), 0);
        let b = operation.apply(&lines(&["x z"]), 1);
        let merged = operation.combine(a, b);
        assert_eq!(merged.get("x"), Some(&3));
        assert_eq!(merged.get("y"), Some(&1));
        assert_eq!(merged.get("z"), Some(&1));
    }

    #[test]
    fn test_render_sorts_by_count_then_word() {
        let operation = op(None);
        let counts = operation.apply(&lines(&["b a b c a c a"]), 0);
        assert_eq!(operation.render(counts), "a 3\nb 2\nc 2\n");
    }

    #[test]
    fn test_render_top_k_truncates_after_sort() {
        let operation = op(Some(1));
        let counts = operation.apply(&lines(&["Alice", "Bob", "alice"]), 0);
        assert_eq!(operation.render(counts), "alice 2\n");
    }

    #[test]
    fn test_render_top_k_zero_means_all() {
        let operation = op(Some(0));
        let counts = operation.apply(&lines(&["a b"]), 0);
        assert_eq!(operation.render(counts), "a 1\nb 1\n");
    }
}
