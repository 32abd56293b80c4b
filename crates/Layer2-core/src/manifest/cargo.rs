//! Cargo.toml

use super::{tagged, ManifestError};
use toml::{Table, Value};

/// `[dependencies]`, `[workspace.dependencies]`, then `[dev-dependencies]`
pub fn parse_cargo_toml(content: &str) -> Result<Vec<String>, ManifestError> {
    let root: Table = content.parse()?;

    let mut deps = Vec::new();
    table_keys(root.get("dependencies"), false, &mut deps)?;
    table_keys(
        root.get("workspace").and_then(|w| w.get("dependencies")),
        false,
        &mut deps,
    )?;
    table_keys(root.get("build-dependencies"), false, &mut deps)?;
    table_keys(root.get("dev-dependencies"), true, &mut deps)?;
    Ok(deps)
}

fn table_keys(value: Option<&Value>, dev: bool, out: &mut Vec<String>) -> Result<(), ManifestError> {
    match value {
        None => Ok(()),
        Some(Value::Table(table)) => {
            out.extend(table.keys().map(|name| tagged(name, dev)));
            Ok(())
        }
        Some(_) => Err(ManifestError::Invalid(
            "dependency section is not a table".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections() {
        let deps = parse_cargo_toml(
            r#"
[package]
name = "demo"

[dependencies]
tokio = { version = "1", features = ["full"] }
serde = "1.0"

[dev-dependencies]
tempfile = "3"
"#,
        )
        .unwrap();
        assert_eq!(deps, vec!["tokio", "serde", "tempfile (dev)"]);
    }

    #[test]
    fn test_workspace_dependencies() {
        let deps = parse_cargo_toml("[workspace.dependencies]\nanyhow = \"1\"\n").unwrap();
        assert_eq!(deps, vec!["anyhow"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_cargo_toml("[dependencies\nserde = 1").unwrap_err(),
            ManifestError::Toml(_)
        ));
    }
}
