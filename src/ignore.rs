//! File and directory ignore pattern handling for msgen templates.
//! This module processes .msgenignore files to exclude specific paths
//! from template processing, similar to .gitignore functionality.

use crate::constants::DEFAULT_IGNORE_PATTERNS;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

pub use crate::constants::IGNORE_FILE;

fn add_pattern(builder: &mut GlobSetBuilder, pattern: &str) -> Result<()> {
    let glob = Glob::new(pattern)
        .map_err(|e| Error::IgnoreError(format!("{IGNORE_FILE} loading failed: {e}")))?;
    builder.add(glob);
    Ok(())
}

/// Reads and processes the .msgenignore file to create a set of glob patterns.
///
/// # Arguments
/// * `ignore_path` - Path to the .msgenignore file
///
/// # Returns
/// * `Result<GlobSet>` - Set of compiled glob patterns for path matching
///
/// # Notes
/// - If the file doesn't exist, only the default patterns are returned
/// - Each non-empty line that is not a `#` comment is a glob pattern
/// - Patterns are matched against paths relative to the template root
///
/// # Example
/// ```ignore
/// # Contents of .msgenignore:
/// *.pyc
/// __pycache__/**
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(ignore_path: P) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_IGNORE_PATTERNS {
        add_pattern(&mut builder, pattern)?;
    }

    if let Ok(contents) = read_to_string(ignore_path.as_ref()) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            add_pattern(&mut builder, line)?;
        }
    } else {
        debug!("{IGNORE_FILE} does not exist");
    }

    builder
        .build()
        .map_err(|e| Error::IgnoreError(format!("{IGNORE_FILE} loading failed: {e}")))
}

/// Loads the ignore patterns of a template directory.
pub fn get_ignore_patterns<P: AsRef<Path>>(template_root: P) -> Result<GlobSet> {
    parse_ignore_file(template_root.as_ref().join(IGNORE_FILE))
}
