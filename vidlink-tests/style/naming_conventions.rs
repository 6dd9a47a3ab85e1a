//! Naming Convention Checker
//!
//! Flags the naming patterns the workspace avoids: accessor prefixes, role
//! suffixes on types, catch-all module names, and `# Errors` sections that
//! do not list error variants as bullets.

use std::fs;
use std::path::Path;

/// A naming violation found in the code
#[derive(Debug)]
struct NamingViolation {
    file_path: String,
    line_number: usize,
    kind: &'static str,
    message: String,
}

/// Collects violations for one source file at a time.
#[derive(Default)]
struct NamingChecker {
    violations: Vec<NamingViolation>,
}

const BANNED_FUNCTION_PREFIXES: &[(&str, &str)] = &[
    ("get_", "Use the noun directly: media.status() not media.get_status()"),
    ("set_", "Describe the change: record.add_invalid_parameter() not record.set_parameters()"),
    ("handle_", "Be specific: run_command() not handle_command()"),
];

const BANNED_TYPE_SUFFIXES: &[(&str, &str)] = &[
    ("Factory", "Use a builder or a plain new() function"),
    ("Service", "Usually adds no meaning - name what the type is"),
];

/// Banned for structs and enums; traits may still use them.
const VERBOSE_TYPE_SUFFIXES: &[(&str, &str)] = &[
    ("Manager", "Name what it IS, not its role"),
    ("Handler", "Be specific about what is handled"),
    ("Processor", "Be specific about what is processed"),
    ("Controller", "Be specific about what is controlled"),
];

const BANNED_MODULE_NAMES: &[&str] = &["utils", "common", "helpers", "misc", "stuff"];

fn is_function_line(trimmed: &str) -> bool {
    ["pub fn ", "pub async fn ", "fn ", "async fn ", "pub(crate) fn "]
        .iter()
        .any(|start| trimmed.starts_with(start))
}

/// Name of the type declared on this line, if it declares one.
fn declared_type(trimmed: &str) -> Option<(&'static str, &str)> {
    let rest = trimmed.strip_prefix("pub ").unwrap_or(trimmed);
    let (keyword, rest) = ["struct ", "enum ", "trait "]
        .iter()
        .find_map(|keyword| Some((*keyword, rest.strip_prefix(keyword)?)))?;

    let name = rest
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default();
    Some((keyword.trim_end(), name))
}

impl NamingChecker {
    fn report(&mut self, file_path: &Path, line_number: usize, kind: &'static str, message: String) {
        self.violations.push(NamingViolation {
            file_path: file_path.display().to_string(),
            line_number,
            kind,
            message,
        });
    }

    fn check_function_prefixes(&mut self, file_path: &Path, content: &str) {
        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if !is_function_line(trimmed) {
                continue;
            }

            for &(prefix, correction) in BANNED_FUNCTION_PREFIXES {
                if trimmed.contains(&format!("fn {prefix}")) {
                    self.report(
                        file_path,
                        index + 1,
                        "BANNED_FUNCTION_PREFIX",
                        format!("Function uses banned prefix '{prefix}'. {correction}"),
                    );
                }
            }
        }
    }

    fn check_type_naming(&mut self, file_path: &Path, content: &str) {
        for (index, line) in content.lines().enumerate() {
            let Some((keyword, name)) = declared_type(line.trim()) else {
                continue;
            };

            for &(suffix, message) in BANNED_TYPE_SUFFIXES {
                if name.ends_with(suffix) {
                    self.report(
                        file_path,
                        index + 1,
                        "BANNED_TYPE_SUFFIX",
                        format!("Type '{name}' uses banned '{suffix}' suffix. {message}"),
                    );
                }
            }

            if keyword == "trait" {
                continue;
            }
            for &(suffix, message) in VERBOSE_TYPE_SUFFIXES {
                if name.ends_with(suffix) {
                    self.report(
                        file_path,
                        index + 1,
                        "VERBOSE_TYPE_SUFFIX",
                        format!("Type '{name}' uses verbose '{suffix}' suffix. {message}"),
                    );
                }
            }
        }
    }

    fn check_module_name(&mut self, file_path: &Path) {
        let Some(stem) = file_path.file_stem() else {
            return;
        };
        let stem = stem.to_string_lossy();

        if BANNED_MODULE_NAMES.contains(&stem.as_ref()) {
            self.report(
                file_path,
                1,
                "BANNED_MODULE_NAME",
                format!("Module name '{stem}' is too generic. Name the concern it covers"),
            );
        }
    }

    /// Checks `# Errors` sections in doc blocks that precede a function.
    fn check_errors_sections(&mut self, file_path: &Path, content: &str) {
        let lines: Vec<&str> = content.lines().map(str::trim).collect();
        let mut start = 0;

        while start < lines.len() {
            if !lines[start].starts_with("///") {
                start += 1;
                continue;
            }

            let end = (start..lines.len())
                .find(|&i| !lines[i].starts_with("///"))
                .unwrap_or(lines.len());
            let documents_function = lines[end..]
                .iter()
                .find(|line| !line.is_empty() && !line.starts_with("#["))
                .is_some_and(|line| is_function_line(line));

            if documents_function {
                self.check_errors_block(file_path, &lines[start..end], start);
            }
            start = end;
        }
    }

    fn check_errors_block(&mut self, file_path: &Path, block: &[&str], offset: usize) {
        let Some(header) = block.iter().position(|line| *line == "/// # Errors") else {
            return;
        };
        let header_line = offset + header + 1;

        if block.get(header + 1) != Some(&"///") {
            self.report(
                file_path,
                header_line,
                "INVALID_DOC_FORMAT",
                "# Errors section must be followed by blank line: `///`".to_string(),
            );
            return;
        }

        let mut bullets = 0;
        for (i, line) in block.iter().enumerate().skip(header + 2) {
            let text = line.trim_start_matches('/').trim();
            if text.is_empty() {
                continue;
            }
            if text.starts_with("# ") {
                break;
            }

            bullets += 1;
            let well_formed = text
                .strip_prefix("- ")
                .is_some_and(|bullet| bullet.starts_with('`') && bullet.contains("` - "));
            if !well_formed {
                self.report(
                    file_path,
                    offset + i + 1,
                    "INVALID_DOC_FORMAT",
                    "Use format `- `ErrorType::Variant` - condition`".to_string(),
                );
            }
        }

        if bullets == 0 {
            self.report(
                file_path,
                header_line,
                "INVALID_DOC_FORMAT",
                "# Errors section cannot be empty - list specific error types".to_string(),
            );
        }
    }

    fn check_source(&mut self, file_path: &Path, content: &str) {
        self.check_function_prefixes(file_path, content);
        self.check_type_naming(file_path, content);
        self.check_module_name(file_path);
        self.check_errors_sections(file_path, content);
    }
}

#[test]
fn test_banned_function_prefixes() {
    let mut checker = NamingChecker::default();
    let source = r#"
impl Record {
    pub fn get_status(&self) -> u32 { 42 }
    pub fn set_status(&mut self, v: u32) { }
    pub fn handle_response(&self) { }
    pub fn status(&self) { }
    fn get_private(&self) -> i32 { 0 }
    pub async fn set_async(&mut self) { }
    pub fn getter(&self) -> u32 { 42 }
    fn decode_get_request(&self) { }
}
"#;

    checker.check_function_prefixes(Path::new("record.rs"), source);

    assert_eq!(checker.violations.len(), 5);
    assert!(checker.violations.iter().all(|v| v.kind == "BANNED_FUNCTION_PREFIX"));
    assert_eq!(checker.violations[0].line_number, 3);
}

#[test]
fn test_type_suffixes() {
    let mut checker = NamingChecker::default();
    let source = r#"
pub struct DecoderFactory {}
pub struct PlaybackService;
pub enum StatusManager { A }
struct ErrorHandler {}
pub trait RequestHandler {}
pub struct ErrorRecordBuilder {}
"#;

    checker.check_type_naming(Path::new("types.rs"), source);

    let names: Vec<&str> = checker
        .violations
        .iter()
        .map(|v| v.message.split('\'').nth(1).unwrap_or_default())
        .collect();
    assert_eq!(
        names,
        vec!["DecoderFactory", "PlaybackService", "StatusManager", "ErrorHandler"]
    );
}

#[test]
fn test_banned_module_names() {
    let mut checker = NamingChecker::default();

    for name in ["utils.rs", "common.rs", "helpers.rs", "misc.rs", "tvod.rs", "mod.rs", "wire.rs"] {
        checker.check_module_name(Path::new(name));
    }

    assert_eq!(checker.violations.len(), 4);
    assert!(checker.violations.iter().all(|v| v.kind == "BANNED_MODULE_NAME"));
}

#[test]
fn test_errors_section_format() {
    let mut checker = NamingChecker::default();
    let source = r#"
/// Good.
///
/// # Errors
///
/// - `ModelError::Decode` - The payload is not JSON
pub fn good() {}

/// Missing blank line.
/// # Errors
/// - `ModelError::Decode` - The payload is not JSON
pub fn missing_blank() {}

/// Prose instead of bullets.
///
/// # Errors
///
/// Returns an error when decoding fails.
#[must_use]
pub fn prose() {}

/// Not a function, ignored.
///
/// # Errors
///
/// whatever
pub struct NotAFunction;
"#;

    checker.check_errors_sections(Path::new("decode.rs"), source);

    let lines: Vec<usize> = checker.violations.iter().map(|v| v.line_number).collect();
    assert_eq!(lines, vec![10, 18]);
}

#[test]
fn naming_convention_enforcement() {
    let files = super::workspace_sources().expect("Failed to scan workspace");
    let mut checker = NamingChecker::default();
    let mut checked = 0;

    // This file carries violations as test input.
    for file in files
        .iter()
        .filter(|file| !file.ends_with("naming_conventions.rs"))
    {
        let content = fs::read_to_string(file).expect("source is readable");
        checker.check_source(file, &content);
        checked += 1;
    }

    for violation in &checker.violations {
        println!(
            "{}:{}:{} - {}",
            violation.file_path, violation.line_number, violation.kind, violation.message
        );
    }
    println!(
        "Naming conventions: {checked} files checked, {} violation(s)",
        checker.violations.len()
    );

    assert!(
        checker.violations.is_empty(),
        "Naming convention violations found - see output above"
    );
}
