//! Limits Configuration - 컨텍스트 크기 한도
//!
//! 트리 노드 수, 파일 수/크기, 최종 문서 문자 수 상한을 설정합니다.

use serde::{Deserialize, Serialize};

/// Size ceilings applied by the accessor and the context builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextLimits {
    /// `fetch_tree` fails with `TreeTooLarge` past this many entries
    pub max_tree_entries: usize,
    /// Maximum number of important files fetched per request
    pub max_important_files: usize,
    /// Files larger than this are never selected; fetched content is capped to it
    pub max_file_bytes: u64,
    /// Hard ceiling on the assembled context document, in characters
    pub max_context_chars: usize,
    /// Dependencies listed per ecosystem before an "... and N more" line
    pub max_dependencies_listed: usize,
    /// Lines kept from each file excerpt
    pub max_excerpt_lines: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_tree_entries: 10_000,
            max_important_files: 15,
            max_file_bytes: 100_000,
            max_context_chars: 120_000,
            max_dependencies_listed: 20,
            max_excerpt_lines: 100,
        }
    }
}

impl ContextLimits {
    /// Small budgets for tests and quick runs
    pub fn compact() -> Self {
        Self {
            max_tree_entries: 2_000,
            max_important_files: 8,
            max_file_bytes: 20_000,
            max_context_chars: 24_000,
            max_dependencies_listed: 10,
            max_excerpt_lines: 40,
        }
    }

    pub fn with_max_context_chars(mut self, chars: usize) -> Self {
        self.max_context_chars = chars;
        self
    }

    pub fn with_max_tree_entries(mut self, entries: usize) -> Self {
        self.max_tree_entries = entries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = ContextLimits::default();
        assert_eq!(limits.max_tree_entries, 10_000);
        assert_eq!(limits.max_dependencies_listed, 20);
        assert_eq!(limits.max_excerpt_lines, 100);
    }

    #[test]
    fn test_compact_is_tighter() {
        let default = ContextLimits::default();
        let compact = ContextLimits::compact();
        assert!(compact.max_context_chars < default.max_context_chars);
        assert!(compact.max_tree_entries < default.max_tree_entries);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let limits: ContextLimits = serde_json::from_str(r#"{"maxContextChars": 500}"#).unwrap();
        assert_eq!(limits.max_context_chars, 500);
        assert_eq!(limits.max_important_files, 15);
    }
}
