//! Dead Code Enforcement
//!
//! Production code must not silence `dead_code`. Unused items are either
//! removed or wired in; test code is exempt.

use std::fs;
use std::path::Path;

/// One offending attribute.
#[derive(Debug)]
struct DeadCodeViolation {
    file_path: String,
    line_number: usize,
    line: String,
}

/// Returns true for sources that only ever compile under test.
fn is_test_source(path: &Path) -> bool {
    let path = path.to_string_lossy().replace('\\', "/").to_lowercase();

    path.contains("/tests/")
        || path.contains("vidlink-tests/")
        || path.contains("test_")
        || path.ends_with("_test.rs")
        || path.ends_with("tests.rs")
}

/// Attribute lines that allow `dead_code`, with 1-based line numbers.
fn scan_source(file_path: &str, content: &str) -> Vec<DeadCodeViolation> {
    let mut violations = Vec::new();
    let mut in_test_module = false;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        // Everything after the test module marker is test code.
        if trimmed == "#[cfg(test)]" {
            in_test_module = true;
        }
        if in_test_module {
            break;
        }

        let allows_dead_code = (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
            && trimmed.contains("dead_code");
        if allows_dead_code {
            violations.push(DeadCodeViolation {
                file_path: file_path.to_string(),
                line_number: index + 1,
                line: trimmed.to_string(),
            });
        }
    }

    violations
}

#[test]
fn test_is_test_source() {
    assert!(is_test_source(Path::new("../vidlink-core/tests/decode.rs")));
    assert!(is_test_source(Path::new("../vidlink-tests/integration/media_resolution.rs")));
    assert!(is_test_source(Path::new("../vidlink-core/src/test_fixtures.rs")));

    assert!(!is_test_source(Path::new("../vidlink-core/src/lib.rs")));
    assert!(!is_test_source(Path::new("../vidlink-core/src/media/tvod.rs")));
    assert!(!is_test_source(Path::new("../vidlink-cli/src/commands.rs")));
}

#[test]
fn test_scan_source_finds_attributes() {
    let source = r#"
use std::collections::HashMap;

#[allow(dead_code)]
struct Unused;

#[allow(clippy::too_many_lines, dead_code)]
fn never_called() {}

#![allow(dead_code)]
"#;

    let violations = scan_source("sample.rs", source);
    let lines: Vec<usize> = violations.iter().map(|v| v.line_number).collect();
    assert_eq!(lines, vec![4, 7, 10]);
}

#[test]
fn test_scan_source_ignores_test_modules() {
    let source = r#"
pub fn used() {}

#[cfg(test)]
mod tests {
    #[allow(dead_code)]
    fn fixture() {}
}
"#;

    assert!(scan_source("sample.rs", source).is_empty());
}

#[test]
fn dead_code_enforcement() {
    let files = super::workspace_sources().expect("Failed to scan workspace");
    let mut violations = Vec::new();
    let mut checked = 0;

    for file in files.iter().filter(|file| !is_test_source(file)) {
        let content = fs::read_to_string(file).expect("source is readable");
        violations.extend(scan_source(&file.display().to_string(), &content));
        checked += 1;
    }

    for violation in &violations {
        println!(
            "{}:{}\n  {}",
            violation.file_path, violation.line_number, violation.line
        );
    }
    println!(
        "Dead code enforcement: {checked} files checked, {} violation(s)",
        violations.len()
    );

    assert!(
        violations.is_empty(),
        "#[allow(dead_code)] found in production code - remove the item or use it"
    );
}
