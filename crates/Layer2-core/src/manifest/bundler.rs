//! Gemfile

use super::{tagged, ManifestError};
use regex::Regex;
use std::sync::OnceLock;

fn gem_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^gem\s+["']([^"']+)["']"#).expect("valid gem pattern"))
}

/// `gem "name"` lines; gems inside a `group :development`/`:test` block are
/// development dependencies
pub fn parse_gemfile(content: &str) -> Result<Vec<String>, ManifestError> {
    let gem = gem_line();

    let mut deps = Vec::new();
    let mut dev_group = false;

    for raw in content.lines() {
        let line = raw.trim();
        if line.starts_with("group ") && line.ends_with(" do") {
            dev_group = line.contains(":development") || line.contains(":test");
        } else if line == "end" {
            dev_group = false;
        } else if let Some(name) = gem.captures(line).and_then(|c| c.get(1)) {
            deps.push(tagged(name.as_str(), dev_group));
        }
    }

    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compiles_once() {
        assert!(std::ptr::eq(gem_line(), gem_line()));
        assert!(gem_line().is_match("gem 'rails'"));
        assert!(!gem_line().is_match("# gem 'rails'"));
    }

    #[test]
    fn test_groups() {
        let deps = parse_gemfile(
            "source 'https://rubygems.org'\n\ngem 'rails', '~> 7.1'\ngem \"pg\"\n\ngroup :development, :test do\n  gem 'rspec-rails'\nend\n\ngem 'puma'\n",
        )
        .unwrap();
        assert_eq!(deps, vec!["rails", "pg", "rspec-rails (dev)", "puma"]);
    }
}
