//! go.mod

use super::ManifestError;

/// Module paths from `require` directives, single-line and block form
pub fn parse_go_mod(content: &str) -> Result<Vec<String>, ManifestError> {
    let mut deps = Vec::new();
    let mut has_module = false;
    let mut in_block = false;

    for raw in content.lines() {
        let line = raw.split_once("//").map_or(raw, |(code, _)| code).trim();
        if line.is_empty() {
            continue;
        }

        if in_block {
            if line == ")" {
                in_block = false;
            } else if let Some(path) = line.split_whitespace().next() {
                deps.push(path.to_string());
            }
            continue;
        }

        if line.starts_with("module ") {
            has_module = true;
        } else if let Some(rest) = line.strip_prefix("require") {
            let rest = rest.trim();
            if rest == "(" {
                in_block = true;
            } else if let Some(path) = rest.split_whitespace().next() {
                deps.push(path.to_string());
            }
        }
    }

    if !has_module {
        return Err(ManifestError::Invalid("missing module directive".to_string()));
    }
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_and_single_require() {
        let deps = parse_go_mod(
            "module example.com/app\n\ngo 1.22\n\nrequire github.com/spf13/cobra v1.8.0\n\nrequire (\n\tgolang.org/x/sync v0.6.0\n\tgithub.com/stretchr/testify v1.9.0 // indirect\n)\n",
        )
        .unwrap();
        assert_eq!(
            deps,
            vec![
                "github.com/spf13/cobra",
                "golang.org/x/sync",
                "github.com/stretchr/testify"
            ]
        );
    }

    #[test]
    fn test_missing_module() {
        assert!(parse_go_mod("require x v1\n").is_err());
    }
}
