//! composer.json

use super::npm::collect_keys;
use super::ManifestError;
use serde_json::Value;

/// Platform requirements (`php`, `ext-*`, `lib-*`) are not packages
fn is_platform(name: &str) -> bool {
    name == "php" || name.starts_with("ext-") || name.starts_with("lib-")
}

pub fn parse_composer_json(content: &str) -> Result<Vec<String>, ManifestError> {
    let value: Value = serde_json::from_str(content)?;
    let root = value
        .as_object()
        .ok_or_else(|| ManifestError::Invalid("composer.json is not an object".to_string()))?;

    let mut deps = Vec::new();
    collect_keys(root, "require", false, &mut deps)?;
    collect_keys(root, "require-dev", true, &mut deps)?;
    deps.retain(|d| !is_platform(d.trim_end_matches(super::DEV_SUFFIX)));
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_platform_requirements() {
        let deps = parse_composer_json(
            r#"{
                "require": {"php": ">=8.1", "ext-json": "*", "laravel/framework": "^10.0"},
                "require-dev": {"phpunit/phpunit": "^10"}
            }"#,
        )
        .unwrap();
        assert_eq!(deps, vec!["laravel/framework", "phpunit/phpunit (dev)"]);
    }
}
