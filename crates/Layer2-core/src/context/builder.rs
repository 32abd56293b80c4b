//! Context Document Builder - 크기 제한이 있는 컨텍스트 문서 조립
//!
//! 섹션 순서는 고정입니다: 메타데이터 → 파일 트리 → 의존성 → 파일 발췌.
//! 문자 수 상한을 넘으면 우선순위가 낮은 섹션(발췌 → 의존성 → 트리 → 메타데이터)부터
//! 잘라내고 끝에 잘림 표시를 붙입니다.

use super::tree::render_tree;
use repolens_foundation::{
    ContextDocument, ContextLimits, DependencySet, FileTree, ImportantFile, RepoMetadata,
    RepositoryRef, Stats,
};
use tracing::{debug, info};

/// Appended whenever any section was trimmed
pub const TRUNCATION_MARKER: &str = "\n[... context truncated to fit the size limit ...]\n";

const EXCERPT_TRUNCATED: &str = "... (truncated)";
const KEY_FILES_HEADER: &str = "\n# Key Files\n";

// ============================================================================
// Sections
// ============================================================================

fn metadata_section(repo: &RepositoryRef, meta: &RepoMetadata) -> String {
    let name = if meta.full_name.is_empty() {
        repo.full_name()
    } else {
        meta.full_name.clone()
    };

    let mut lines = vec![
        "# Repository Information".to_string(),
        format!("**Name:** {}", name),
        format!(
            "**Description:** {}",
            meta.description.as_deref().unwrap_or("No description")
        ),
        format!(
            "**Primary Language:** {}",
            meta.language.as_deref().unwrap_or("Unknown")
        ),
        format!("**Stars:** {}", meta.stars),
        format!(
            "**License:** {}",
            meta.license.as_deref().unwrap_or("Not specified")
        ),
    ];

    if !meta.topics.is_empty() {
        lines.push(format!("**Topics:** {}", meta.topics.join(", ")));
    }

    let total: u64 = meta.languages.iter().map(|l| l.bytes).sum();
    if total > 0 {
        let shares: Vec<String> = meta
            .languages
            .iter()
            .map(|l| format!("{} ({:.1}%)", l.name, l.bytes as f64 * 100.0 / total as f64))
            .collect();
        lines.push(format!("**Languages:** {}", shares.join(", ")));
    }

    lines.join("\n") + "\n"
}

fn tree_section(tree: &FileTree) -> String {
    let rendered = if tree.is_empty() {
        "(empty repository)".to_string()
    } else {
        render_tree(tree)
    };
    format!("# File Structure\n```\n{}\n```\n", rendered)
}

fn dependency_section(deps: &DependencySet, max_listed: usize) -> Option<String> {
    if deps.is_empty() {
        return None;
    }

    let mut lines = vec!["# Dependencies".to_string()];
    for (ecosystem, names) in deps {
        lines.push(format!("## {}", ecosystem.to_uppercase()));
        if names.is_empty() {
            lines.push("(none declared)".to_string());
        }
        lines.extend(names.iter().take(max_listed).map(|n| format!("- {}", n)));
        if names.len() > max_listed {
            lines.push(format!("... and {} more", names.len() - max_listed));
        }
    }

    Some(lines.join("\n") + "\n")
}

fn excerpt_block(file: &ImportantFile, max_lines: usize) -> String {
    let lines: Vec<&str> = file.content.lines().collect();
    let mut block = format!("## {}\n```\n", file.path);
    for line in lines.iter().take(max_lines) {
        block.push_str(line);
        block.push('\n');
    }
    if lines.len() > max_lines {
        block.push_str(EXCERPT_TRUNCATED);
        block.push('\n');
    }
    block.push_str("```\n");
    block
}

/// Leading lines of an excerpt block within `chars`, fence closed
///
/// `None` when not even one content line fits.
fn cut_excerpt(block: &str, chars: usize) -> Option<String> {
    let closing = format!("{}\n```\n", EXCERPT_TRUNCATED);
    let mut budget = Budget::new(chars.checked_sub(closing.chars().count())?);
    let body = block.strip_suffix("```\n").unwrap_or(block);

    let mut out = String::new();
    let mut lines = 0;
    for line in body.split_inclusive('\n') {
        if !budget.push_whole(&mut out, line) {
            break;
        }
        lines += 1;
    }
    // "## path", opening fence, one content line
    if lines < 3 {
        return None;
    }

    out.push_str(&closing);
    Some(out)
}

// ============================================================================
// Budget
// ============================================================================

/// Remaining characters while sections are appended highest priority first
struct Budget {
    remaining: usize,
}

impl Budget {
    fn new(chars: usize) -> Self {
        Self { remaining: chars }
    }

    /// Append `text` only if all of it fits
    fn push_whole(&mut self, out: &mut String, text: &str) -> bool {
        let len = text.chars().count();
        if len > self.remaining {
            return false;
        }
        out.push_str(text);
        self.remaining -= len;
        true
    }

    /// Append as many whole lines of `text` as fit; returns whether all did
    fn push_lines(&mut self, out: &mut String, text: &str) -> bool {
        for line in text.split_inclusive('\n') {
            if !self.push_whole(out, line) {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// build_context
// ============================================================================

/// Assemble the context document and the repository statistics
///
/// Stats come from the complete tree and are unaffected by trimming. The
/// document never exceeds `limits.max_context_chars` characters and the
/// same inputs always produce the same text.
pub fn build_context(
    repo: &RepositoryRef,
    metadata: &RepoMetadata,
    tree: &FileTree,
    files: &[ImportantFile],
    deps: &DependencySet,
    limits: &ContextLimits,
) -> (ContextDocument, Stats) {
    let stats = Stats::from_tree(tree);

    let mut sections = vec![metadata_section(repo, metadata), tree_section(tree)];
    if let Some(section) = dependency_section(deps, limits.max_dependencies_listed) {
        sections.push(section);
    }
    let excerpts: Vec<String> = files
        .iter()
        .map(|f| excerpt_block(f, limits.max_excerpt_lines))
        .collect();

    let full = assemble(&sections, &excerpts);
    let untruncated_chars = full.chars().count();
    let ceiling = limits.max_context_chars;

    if untruncated_chars <= ceiling {
        debug!("Context document: {} chars", untruncated_chars);
        return (
            ContextDocument {
                text: full,
                truncated: false,
                untruncated_chars,
            },
            stats,
        );
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    let mut budget = Budget::new(ceiling.saturating_sub(marker_len));
    let mut text = String::with_capacity(ceiling);

    let mut complete = true;
    for (idx, section) in sections.iter().enumerate() {
        let fits = (idx == 0 || budget.push_whole(&mut text, "\n"))
            && budget.push_lines(&mut text, section);
        if !fits {
            complete = false;
            break;
        }
    }
    if complete && !excerpts.is_empty() && budget.push_whole(&mut text, KEY_FILES_HEADER) {
        for block in &excerpts {
            if !budget.push_whole(&mut text, block) {
                if let Some(head) = cut_excerpt(block, budget.remaining) {
                    budget.push_whole(&mut text, &head);
                }
                break;
            }
        }
    }

    text.push_str(TRUNCATION_MARKER);
    if text.chars().count() > ceiling {
        text = text.chars().take(ceiling).collect();
    }

    info!(
        "Context document trimmed from {} to {} chars",
        untruncated_chars,
        text.chars().count()
    );

    (
        ContextDocument {
            text,
            truncated: true,
            untruncated_chars,
        },
        stats,
    )
}

fn assemble(sections: &[String], excerpts: &[String]) -> String {
    let mut out = sections.join("\n");
    if !excerpts.is_empty() {
        out.push_str(KEY_FILES_HEADER);
        for block in excerpts {
            out.push_str(block);
        }
    }
    out
}
