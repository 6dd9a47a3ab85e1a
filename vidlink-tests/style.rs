//! Style Enforcement Tests
//!
//! Checks the workspace crates for conventions clippy does not cover.
//!
//! - `naming_conventions` - Banned prefixes, suffixes, module names and doc layout
//! - `dead_code_enforcement` - No `#[allow(dead_code)]` outside tests
//!
//! Only `vidlink-*` crate directories next to this one are scanned.

use std::fs;
use std::path::{Path, PathBuf};

#[path = "style/naming_conventions.rs"]
mod naming_conventions;

#[path = "style/dead_code_enforcement.rs"]
mod dead_code_enforcement;

/// Prefix shared by every crate directory in the workspace.
const CRATE_PREFIX: &str = "vidlink-";

/// Collects the Rust sources of all workspace crates.
///
/// # Errors
///
/// - `std::io::Error` - A directory under the workspace cannot be read
fn workspace_sources() -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir("..")? {
        let path = entry?.path();
        let is_crate = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with(CRATE_PREFIX));
        if is_crate && path.is_dir() {
            collect_sources(&path, &mut files)?;
        }
    }

    files.sort();
    Ok(files)
}

fn collect_sources(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let skipped = path.file_name().is_some_and(|name| {
            let name = name.to_string_lossy();
            name.starts_with('.') || name == "target" || name == "fixtures"
        });
        if skipped {
            continue;
        }

        if path.is_dir() {
            collect_sources(&path, files)?;
        } else if path.extension().is_some_and(|extension| extension == "rs") {
            files.push(path);
        }
    }
    Ok(())
}

#[test]
fn workspace_sources_cover_all_crates() {
    let files = workspace_sources().expect("workspace is readable");

    for expected in ["vidlink-core", "vidlink-cli", "vidlink-tests"] {
        assert!(
            files
                .iter()
                .any(|file| file.to_string_lossy().contains(expected)),
            "no sources found for {expected}"
        );
    }
    assert!(
        !files
            .iter()
            .any(|file| file.components().any(|part| part.as_os_str() == "target"))
    );
}
