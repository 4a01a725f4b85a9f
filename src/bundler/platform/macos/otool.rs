//! Parser for `otool -L` output.
//!
//! The accepted grammar:
//!
//! ```text
//! output  := header (header | dep)*
//! header  := <path> [" (architecture " <arch> ")"] ":"
//! dep     := WS <install-name> " (" attrs ")"
//! attrs   := "compatibility version " V ", current version " V ("," WS flag)*
//! ```
//!
//! Fat binaries print one header per architecture slice; dependencies repeated
//! across slices are reported once, in first-seen order. Anything else is an
//! [`Error::InspectorOutput`].

use crate::bundler::error::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<path>\S.*?)(?: \(architecture (?P<arch>[^)]+)\))?:$").expect("valid regex")
});

static DEPENDENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s+(?P<name>\S.*?) \(compatibility version (?P<compat>[^,]+), current version (?P<current>[^,)]+)(?P<flags>(?:, [^,)]+)*)\)\s*$",
    )
    .expect("valid regex")
});

/// One dependency reported by `otool -L`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DependencyLine {
    /// Install name, absolute or `@rpath/` relative.
    pub install_name: String,
    /// `compatibility version` annotation.
    pub compatibility_version: String,
    /// `current version` annotation.
    pub current_version: String,
    /// Extra load-command flags such as `weak` or `reexport`.
    pub flags: Vec<String>,
}

/// Parses the stdout of `otool -L <path>`.
pub fn parse_dependencies(path: &Path, output: &str) -> Result<Vec<DependencyLine>> {
    let mut deps = Vec::new();
    let mut seen = HashSet::new();
    let mut saw_header = false;

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with(char::is_whitespace) && HEADER.is_match(line) {
            saw_header = true;
            continue;
        }
        let caps = match DEPENDENCY.captures(line) {
            Some(caps) if saw_header => caps,
            _ => {
                return Err(Error::InspectorOutput {
                    path: path.to_path_buf(),
                    line: line.to_string(),
                });
            }
        };

        let install_name = caps["name"].to_string();
        if !seen.insert(install_name.clone()) {
            continue;
        }
        deps.push(DependencyLine {
            install_name,
            compatibility_version: caps["compat"].trim().to_string(),
            current_version: caps["current"].trim().to_string(),
            flags: caps["flags"]
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect(),
        });
    }

    Ok(deps)
}
