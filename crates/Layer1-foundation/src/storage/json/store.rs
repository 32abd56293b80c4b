//! 설정 디렉토리 (읽기 전용)
//!
//! RepoLens는 설정을 쓰지 않습니다. 파일이 없으면 "설정 없음"으로 취급하고,
//! 읽을 수 없거나 JSON이 아니면 `Error::Config`로 실패합니다.

use crate::{Error, Result};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One directory that may hold RepoLens config files
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `<config_dir>/repolens/`
    pub fn global() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join("repolens");
        Ok(Self::new(dir))
    }

    /// `<root>/.repolens/`
    pub fn project(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(".repolens"))
    }

    pub fn current_project() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot get current directory: {}", e)))?;
        Ok(Self::project(cwd))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Parsed `filename`, or `None` when it does not exist
    pub fn load_value(&self, filename: &str) -> Result<Option<Value>> {
        let path = self.base_dir.join(filename);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Config(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}
