//! package.json

use super::{tagged, ManifestError};
use serde_json::{Map, Value};

/// `dependencies` then `devDependencies`, in declared order
pub fn parse_package_json(content: &str) -> Result<Vec<String>, ManifestError> {
    let value: Value = serde_json::from_str(content)?;
    let root = value
        .as_object()
        .ok_or_else(|| ManifestError::Invalid("package.json is not an object".to_string()))?;

    let mut deps = Vec::new();
    collect_keys(root, "dependencies", false, &mut deps)?;
    collect_keys(root, "devDependencies", true, &mut deps)?;
    Ok(deps)
}

/// Shared with composer.json, which uses the same `{name: constraint}` layout
pub(crate) fn collect_keys(
    root: &Map<String, Value>,
    field: &str,
    dev: bool,
    out: &mut Vec<String>,
) -> Result<(), ManifestError> {
    match root.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Object(table)) => {
            out.extend(table.keys().map(|name| tagged(name, dev)));
            Ok(())
        }
        Some(_) => Err(ManifestError::Invalid(format!("`{}` is not an object", field))),
    }
}
