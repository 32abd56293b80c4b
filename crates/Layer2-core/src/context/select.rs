//! Important File Selection - 분석에 보낼 파일 고르기
//!
//! 우선순위:
//! 1. 루트의 README 계열
//! 2. 모든 생태계의 매니페스트 (루트 먼저, 그 다음 하위 디렉토리 순회 순서)
//! 3. 루트의 설정/엔트리포인트 파일 (고정 허용 목록)

use crate::manifest::is_manifest;
use repolens_foundation::{ContextLimits, FileTree, TreeEntry};
use std::collections::HashSet;
use tracing::debug;

/// Directories holding third-party or generated code
const VENDORED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "third_party",
    ".git",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".venv",
    "venv",
];

/// Root-level configuration and entry-point files
const ROOT_ALLOWLIST: &[&str] = &[
    "Makefile",
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "LICENSE",
    "LICENSE.md",
    "LICENSE.txt",
    ".gitignore",
    "setup.py",
    "setup.cfg",
    "tsconfig.json",
    "main.py",
    "app.py",
    "manage.py",
    "index.js",
    "index.ts",
    "main.go",
    "main.rs",
    ".env.example",
];

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "psd", "pdf", "zip", "tar", "gz",
    "tgz", "bz2", "xz", "7z", "rar", "jar", "war", "class", "exe", "dll", "so", "dylib", "o",
    "a", "lib", "bin", "wasm", "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4", "mov", "avi",
    "wav", "flac", "ogg", "pyc", "db", "sqlite",
];

fn is_readme(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "readme" || lower.starts_with("readme.")
}

/// Judged by extension alone
pub fn is_binary_path(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        _ => false,
    }
}

fn in_vendored_dir(path: &str) -> bool {
    path.split('/')
        .rev()
        .skip(1)
        .any(|dir| VENDORED_DIRS.contains(&dir))
}

/// Paths worth fetching, in priority order, at most `max_important_files`
///
/// Directories, binary-looking paths and files larger than
/// `max_file_bytes` are never selected.
pub fn select_important_files(tree: &FileTree, limits: &ContextLimits) -> Vec<String> {
    let root = |e: &&TreeEntry| e.is_root_level();
    let nested = |e: &&TreeEntry| !e.is_root_level() && !in_vendored_dir(&e.path);

    let readmes = tree.files().filter(root).filter(|e| is_readme(e.name()));
    let root_manifests = tree.files().filter(root).filter(|e| is_manifest(e.name()));
    let nested_manifests = tree
        .files()
        .filter(nested)
        .filter(|e| is_manifest(e.name()));
    let extras = tree
        .files()
        .filter(root)
        .filter(|e| ROOT_ALLOWLIST.contains(&e.name()));

    let mut seen = HashSet::new();
    let selected: Vec<String> = readmes
        .chain(root_manifests)
        .chain(nested_manifests)
        .chain(extras)
        .filter(|e| e.size_bytes <= limits.max_file_bytes && !is_binary_path(&e.path))
        .filter(|e| seen.insert(e.path.clone()))
        .take(limits.max_important_files)
        .map(|e| e.path.clone())
        .collect();

    debug!("Selected {} of {} files", selected.len(), tree.files().count());
    selected
}
