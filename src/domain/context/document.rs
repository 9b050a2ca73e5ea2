//! Parsed document text ready for context injection.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DocumentId;

/// Extracted text of an uploaded document, ready to be injected into a
/// completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub id: DocumentId,
    /// Original file name, shown in the injected prefix block.
    pub name: String,
    /// Full extracted text.
    pub text: String,
}

impl ContextDocument {
    /// Creates a new context document.
    pub fn new(id: DocumentId, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Truncates oversized text to `budget` characters, keeping the head and
/// tail halves and marking how much was dropped in between.
///
/// The result is deterministic for a given input, so repeated assemblies of
/// the same documents produce byte-identical prefixes.
pub fn truncate_head_tail(text: &str, budget: usize) -> String {
    let total = text.chars().count();
    if total <= budget {
        return text.to_string();
    }

    let head_len = budget / 2;
    let tail_len = budget - head_len;
    let omitted = total - head_len - tail_len;

    let head: String = text.chars().take(head_len).collect();
    let tail: String = text.chars().skip(total - tail_len).collect();

    format!("{}\n[... {} characters omitted ...]\n{}", head, omitted, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through_unchanged() {
        assert_eq!(truncate_head_tail("hello", 100), "hello");
    }

    #[test]
    fn text_at_budget_passes_through_unchanged() {
        let text = "x".repeat(100);
        assert_eq!(truncate_head_tail(&text, 100), text);
    }

    #[test]
    fn oversized_text_keeps_head_and_tail() {
        let text = format!("{}{}{}", "a".repeat(50), "b".repeat(100), "c".repeat(50));
        let truncated = truncate_head_tail(&text, 100);

        assert!(truncated.starts_with(&"a".repeat(50)));
        assert!(truncated.ends_with(&"c".repeat(50)));
        assert!(truncated.contains("[... 100 characters omitted ...]"));
    }

    #[test]
    fn odd_budget_splits_deterministically() {
        let text = "x".repeat(20);
        let a = truncate_head_tail(&text, 7);
        let b = truncate_head_tail(&text, 7);
        assert_eq!(a, b);
        assert!(a.contains("[... 13 characters omitted ...]"));
    }

    #[test]
    fn multibyte_text_truncates_on_char_boundaries() {
        let text = "é".repeat(50);
        let truncated = truncate_head_tail(&text, 10);
        assert!(truncated.starts_with(&"é".repeat(5)));
        assert!(truncated.ends_with(&"é".repeat(5)));
        assert!(truncated.contains("40 characters omitted"));
    }
}
