//! Tree Rendering - 박스 문자 트리 출력
//!
//! ```text
//! ├── src/
//! │   ├── main.rs (1.2 KB)
//! │   └── lib.rs (0.3 KB)
//! └── README.md (2.0 KB)
//! ```

use repolens_foundation::{FileTree, TreeEntry};
use std::collections::{HashMap, HashSet};

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Render a tree in traversal order
///
/// Children stay in the order the listing produced them. An entry whose
/// parent directory is missing from the listing is shown at the root under
/// its full path.
pub fn render_tree(tree: &FileTree) -> String {
    let dirs: HashSet<&str> = tree
        .iter()
        .filter(|e| e.is_dir())
        .map(|e| e.path.as_str())
        .collect();

    let mut children: HashMap<&str, Vec<&TreeEntry>> = HashMap::new();
    let mut roots = Vec::new();
    for entry in tree.iter() {
        match entry.parent().filter(|p| dirs.contains(p)) {
            Some(parent) => children.entry(parent).or_default().push(entry),
            None => roots.push(entry),
        }
    }

    let mut lines = Vec::with_capacity(tree.len());
    render_level(&roots, &children, "", true, &mut lines);
    lines.join("\n")
}

fn render_level(
    level: &[&TreeEntry],
    children: &HashMap<&str, Vec<&TreeEntry>>,
    prefix: &str,
    at_root: bool,
    lines: &mut Vec<String>,
) {
    for (idx, entry) in level.iter().enumerate() {
        let is_last = idx + 1 == level.len();
        let connector = if is_last { LAST } else { BRANCH };
        let label = if at_root { entry.path.as_str() } else { entry.name() };

        if entry.is_dir() {
            lines.push(format!("{}{}{}/", prefix, connector, label));
            if let Some(kids) = children.get(entry.path.as_str()) {
                let extension = if is_last { SPACE } else { PIPE };
                render_level(kids, children, &format!("{}{}", prefix, extension), false, lines);
            }
        } else {
            lines.push(format!(
                "{}{}{} ({:.1} KB)",
                prefix,
                connector,
                label,
                entry.size_bytes as f64 / 1024.0
            ));
        }
    }
}
