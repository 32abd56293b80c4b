//! requirements.txt / pyproject.toml

use super::{tagged, ManifestError};
use toml::{Table, Value};

/// Leading distribution name of a PEP 508 requirement
fn requirement_name(requirement: &str) -> Option<&str> {
    let requirement = requirement.trim_start();
    let end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or(requirement.len());
    let name = &requirement[..end];
    name.starts_with(|c: char| c.is_ascii_alphanumeric())
        .then_some(name)
}

/// Name of one requirements.txt line
///
/// URL and VCS lines only name a package through `#egg=` or a PEP 508
/// `name @ url` prefix; bare archive URLs name nothing.
fn requirements_line_name(line: &str) -> Option<&str> {
    if let Some((_, egg)) = line.split_once("#egg=") {
        let egg = egg.split(['&', ' ']).next().unwrap_or(egg);
        return requirement_name(egg);
    }
    if !line.contains("://") {
        return requirement_name(line);
    }
    match line.split_once('@') {
        Some((name, _)) if !name.contains("://") => requirement_name(name),
        _ => None,
    }
}

/// One requirement per line; options (`-r`, `-e`, `--index-url`) and
/// comments are skipped, version specifiers and markers stripped
pub fn parse_requirements(content: &str) -> Result<Vec<String>, ManifestError> {
    let deps = content
        .lines()
        .map(|line| line.split_once(" #").map_or(line, |(req, _)| req).trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(requirements_line_name)
        .map(str::to_string)
        .collect();
    Ok(deps)
}

/// PEP 621 `[project]` and Poetry tables
pub fn parse_pyproject(content: &str) -> Result<Vec<String>, ManifestError> {
    let root: Table = content.parse()?;
    let mut deps = Vec::new();

    if let Some(list) = root.get("project").and_then(|p| p.get("dependencies")) {
        let Value::Array(items) = list else {
            return Err(ManifestError::Invalid(
                "project.dependencies is not an array".to_string(),
            ));
        };
        deps.extend(
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(requirement_name)
                .map(str::to_string),
        );
    }

    if let Some(poetry) = root
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(Value::as_table)
    {
        poetry_keys(poetry.get("dependencies"), false, &mut deps);
        poetry_keys(poetry.get("dev-dependencies"), true, &mut deps);
        if let Some(groups) = poetry.get("group").and_then(Value::as_table) {
            for group in groups.values() {
                poetry_keys(group.get("dependencies"), true, &mut deps);
            }
        }
    }

    Ok(deps)
}

fn poetry_keys(section: Option<&Value>, dev: bool, out: &mut Vec<String>) {
    if let Some(table) = section.and_then(Value::as_table) {
        out.extend(
            table
                .keys()
                .filter(|name| name.as_str() != "python")
                .map(|name| tagged(name, dev)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_strip_specifiers() {
        let deps = parse_requirements(
            "# web\nflask==2.3.0\nrequests >= 2.0  # http\nuvicorn[standard]~=0.23\n\n-r dev.txt\n--index-url https://x\nnumpy; python_version > '3.8'\n",
        )
        .unwrap();
        assert_eq!(deps, vec!["flask", "requests", "uvicorn", "numpy"]);
    }

    #[test]
    fn test_requirements_url_lines() {
        let deps = parse_requirements(
            "git+https://github.com/psf/requests.git#egg=requests\nhttps://example.com/pkg.whl\ngit+ssh://git@github.com/org/private.git\ntorch @ https://download.pytorch.org/torch.whl\ndjango\n",
        )
        .unwrap();
        assert_eq!(deps, vec!["requests", "torch", "django"]);
    }

    #[test]
    fn test_pyproject_pep621() {
        let deps = parse_pyproject(
            r#"
[project]
name = "demo"
dependencies = ["httpx>=0.25", "pydantic[email]"]
"#,
        )
        .unwrap();
        assert_eq!(deps, vec!["httpx", "pydantic"]);
    }

    #[test]
    fn test_pyproject_poetry() {
        let deps = parse_pyproject(
            r#"
[tool.poetry.dependencies]
python = "^3.11"
fastapi = "^0.110"

[tool.poetry.group.dev.dependencies]
pytest = "^8"
"#,
        )
        .unwrap();
        assert_eq!(deps, vec!["fastapi", "pytest (dev)"]);
    }

    #[test]
    fn test_pyproject_bad_shape() {
        assert!(parse_pyproject("[project]\ndependencies = \"requests\"\n").is_err());
    }
}
