//! pom.xml / build.gradle(.kts)
//!
//! XML와 Groovy/Kotlin DSL은 정규식으로 `group:artifact`만 뽑아냅니다.

use super::{tagged, ManifestError};
use regex::Regex;
use std::sync::OnceLock;

fn dependency_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<dependency>(.*?)</dependency>").expect("valid <dependency> pattern")
    })
}

fn gradle_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^\s*(implementation|api|compileOnly|runtimeOnly|annotationProcessor|kapt|compile|testImplementation|testCompileOnly|testRuntimeOnly|androidTestImplementation)\s*\(?\s*["']([^"':\s]+):([^"':\s]+)"#,
        )
        .expect("valid gradle declaration pattern")
    })
}

/// `<dependency>` blocks; `test` scope counts as development
pub fn parse_pom(content: &str) -> Result<Vec<String>, ManifestError> {
    if !content.contains("<project") {
        return Err(ManifestError::Invalid("missing <project> element".to_string()));
    }

    let deps = dependency_block()
        .captures_iter(content)
        .filter_map(|c| {
            let body = c.get(1)?.as_str();
            let group = xml_text(body, "groupId")?;
            let artifact = xml_text(body, "artifactId")?;
            let dev = xml_text(body, "scope") == Some("test");
            Some(tagged(&format!("{}:{}", group, artifact), dev))
        })
        .collect();
    Ok(deps)
}

fn xml_text<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = body.find(&open)? + open.len();
    let len = body[start..].find(&close)?;
    Some(body[start..start + len].trim())
}

/// String-notation declarations: `implementation("g:a:v")`, `testImplementation 'g:a:v'`
pub fn parse_gradle(content: &str) -> Result<Vec<String>, ManifestError> {
    let deps = gradle_decl()
        .captures_iter(content)
        .filter_map(|c| {
            let config = c.get(1)?.as_str();
            let name = format!("{}:{}", c.get(2)?.as_str(), c.get(3)?.as_str());
            let dev = config.starts_with("test") || config.starts_with("androidTest");
            Some(tagged(&name, dev))
        })
        .collect();
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile_once() {
        assert!(std::ptr::eq(dependency_block(), dependency_block()));
        assert!(std::ptr::eq(gradle_decl(), gradle_decl()));
        assert!(gradle_decl().is_match("  testImplementation 'junit:junit:4.13'"));
    }

    #[test]
    fn test_pom() {
        let deps = parse_pom(
            r#"<project>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-web</artifactId>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();
        assert_eq!(
            deps,
            vec![
                "org.springframework.boot:spring-boot-starter-web",
                "junit:junit (dev)"
            ]
        );
    }

    #[test]
    fn test_pom_requires_project() {
        assert!(parse_pom("<html></html>").is_err());
    }

    #[test]
    fn test_gradle_groovy_and_kotlin() {
        let deps = parse_gradle(
            "dependencies {\n    implementation 'com.google.guava:guava:32.0-jre'\n    implementation(\"io.ktor:ktor-server-core:2.3.0\")\n    testImplementation 'junit:junit:4.13'\n}\n",
        )
        .unwrap();
        assert_eq!(
            deps,
            vec![
                "com.google.guava:guava",
                "io.ktor:ktor-server-core",
                "junit:junit (dev)"
            ]
        );
    }
}
