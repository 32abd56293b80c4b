//! Manifest Registry - 생태계별 의존성 추출
//!
//! 생태계 → 매니페스트 파일명 → 파서 테이블로 구성됩니다.
//! 새 생태계를 추가하려면 파서 모듈을 만들고 `REGISTRY`에 한 줄 추가하면 됩니다.
//!
//! 하나의 매니페스트 파싱 실패는 경고 로그만 남기고 다른 생태계에 영향을 주지 않습니다.

mod bundler;
mod cargo;
mod composer;
mod go;
mod jvm;
mod npm;
mod python;

use repolens_foundation::{DependencySet, ImportantFile};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Suffix appended to development-only dependencies
pub const DEV_SUFFIX: &str = " (dev)";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

pub type ParseFn = fn(&str) -> Result<Vec<String>, ManifestError>;

/// One recognized manifest file name and its parser
#[derive(Debug, Clone, Copy)]
pub struct Manifest {
    pub file_name: &'static str,
    pub parse: ParseFn,
}

#[derive(Debug)]
pub struct Ecosystem {
    pub name: &'static str,
    pub manifests: &'static [Manifest],
}

// ============================================================================
// Registry
// ============================================================================

pub const REGISTRY: &[Ecosystem] = &[
    Ecosystem {
        name: "npm",
        manifests: &[Manifest {
            file_name: "package.json",
            parse: npm::parse_package_json,
        }],
    },
    Ecosystem {
        name: "pip",
        manifests: &[
            Manifest {
                file_name: "requirements.txt",
                parse: python::parse_requirements,
            },
            Manifest {
                file_name: "pyproject.toml",
                parse: python::parse_pyproject,
            },
        ],
    },
    Ecosystem {
        name: "cargo",
        manifests: &[Manifest {
            file_name: "Cargo.toml",
            parse: cargo::parse_cargo_toml,
        }],
    },
    Ecosystem {
        name: "go",
        manifests: &[Manifest {
            file_name: "go.mod",
            parse: go::parse_go_mod,
        }],
    },
    Ecosystem {
        name: "maven",
        manifests: &[Manifest {
            file_name: "pom.xml",
            parse: jvm::parse_pom,
        }],
    },
    Ecosystem {
        name: "gradle",
        manifests: &[
            Manifest {
                file_name: "build.gradle",
                parse: jvm::parse_gradle,
            },
            Manifest {
                file_name: "build.gradle.kts",
                parse: jvm::parse_gradle,
            },
        ],
    },
    Ecosystem {
        name: "composer",
        manifests: &[Manifest {
            file_name: "composer.json",
            parse: composer::parse_composer_json,
        }],
    },
    Ecosystem {
        name: "bundler",
        manifests: &[Manifest {
            file_name: "Gemfile",
            parse: bundler::parse_gemfile,
        }],
    },
];

/// Look up the ecosystem and parser for a file name (not a path)
pub fn find_manifest(file_name: &str) -> Option<(&'static Ecosystem, &'static Manifest)> {
    REGISTRY.iter().find_map(|eco| {
        eco.manifests
            .iter()
            .find(|m| m.file_name == file_name)
            .map(|m| (eco, m))
    })
}

pub fn is_manifest(file_name: &str) -> bool {
    find_manifest(file_name).is_some()
}

// ============================================================================
// Extraction
// ============================================================================

/// Declared dependencies per ecosystem
///
/// Never fails: a manifest that does not parse is logged and skipped, and an
/// ecosystem is present only if at least one of its manifests parsed.
/// Identifiers keep their first occurrence across manifests.
pub fn extract_dependencies(files: &[ImportantFile]) -> DependencySet {
    let mut deps = DependencySet::new();

    for file in files {
        let Some((eco, manifest)) = find_manifest(file.file_name()) else {
            continue;
        };

        match (manifest.parse)(&file.content) {
            Ok(found) => {
                debug!("{}: {} {} dependencies", file.path, found.len(), eco.name);
                deps.entry(eco.name.to_string()).or_default().extend(found);
            }
            Err(e) => warn!("Skipping {} ({}): {}", file.path, eco.name, e),
        }
    }

    for list in deps.values_mut() {
        dedup_in_order(list);
    }

    deps
}

fn dedup_in_order(list: &mut Vec<String>) {
    let mut seen = HashSet::new();
    list.retain(|item| seen.insert(item.clone()));
}

/// `name` or `name (dev)`
pub(crate) fn tagged(name: &str, dev: bool) -> String {
    if dev {
        format!("{}{}", name, DEV_SUFFIX)
    } else {
        name.to_string()
    }
}
