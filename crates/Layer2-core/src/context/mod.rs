//! Context Builder - 트리 렌더링, 파일 선택, 문서 조립

mod builder;
mod select;
mod tree;

pub use builder::{build_context, TRUNCATION_MARKER};
pub use select::{is_binary_path, select_important_files};
pub use tree::render_tree;
