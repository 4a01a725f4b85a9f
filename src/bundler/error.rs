//! Error types for bundle assembly.
//!
//! All fallible bundler operations return [`Result`]. Filesystem failures carry
//! the path and a short description of what was being attempted, and failures
//! of child processes or network requests are grouped as external dependency
//! failures (see [`Error::is_external`]).

use std::path::{Path, PathBuf};

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while assembling a bundle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Plain I/O error without further context.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The built executable is not present in the build tree.
    #[error("{} not found! Please run this tool from the build directory of ART", path.display())]
    MissingExecutable {
        /// Expected location of the executable
        path: PathBuf,
    },

    /// The output bundle directory already exists.
    #[error("output bundle already exists: {}", path.display())]
    BundleExists {
        /// Bundle directory that would be overwritten
        path: PathBuf,
    },

    /// The dependency prefix could not be derived from the main executable.
    #[error("can't determine prefix from the dependencies of {}; pass --prefix", executable.display())]
    PrefixNotFound {
        /// Executable whose dependencies were searched
        executable: PathBuf,
    },

    /// A required external tool is not on `PATH`.
    #[error("required tool `{tool}` not found in PATH")]
    ToolNotFound {
        /// Tool name
        tool: String,
    },

    /// An external tool could not be started or exited unsuccessfully.
    #[error("{tool} failed: {reason}")]
    ExternalTool {
        /// Tool name
        tool: String,
        /// Exit status and captured stderr, or the spawn error
        reason: String,
    },

    /// An external tool did not finish in time and was killed.
    #[error("{tool} did not finish within {seconds}s")]
    Timeout {
        /// Tool name
        tool: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The library inspector printed a line outside its output grammar.
    #[error("unexpected otool output for {}: {line:?}", path.display())]
    InspectorOutput {
        /// File that was inspected
        path: PathBuf,
        /// Offending output line
        line: String,
    },

    /// HTTP transport failure.
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP request completed with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// No release in the feed carries the requested asset.
    #[error("no published release provides asset {name}")]
    AssetNotPublished {
        /// Exact asset file name
        name: String,
    },

    /// Template registration or rendering failed.
    #[error("template error: {0}")]
    Template(String),

    /// Property list serialization failed.
    #[error("Info.plist error: {0}")]
    Plist(#[from] plist::Error),

    /// Invalid glob pattern in the asset plan.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory traversal failed.
    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path was not under the expected base.
    #[error("path prefix error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Returns true for failures of collaborators outside this process:
    /// child processes and network requests.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Error::ToolNotFound { .. }
                | Error::ExternalTool { .. }
                | Error::Timeout { .. }
                | Error::Network(_)
                | Error::HttpStatus { .. }
        )
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(e: handlebars::RenderError) -> Self {
        Error::Template(e.to_string())
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(e: handlebars::TemplateError) -> Self {
        Error::Template(e.to_string())
    }
}

/// Attaches a description and path to I/O results.
pub trait ErrorExt<T> {
    /// Converts an I/O error into [`Error::Fs`].
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Adds a message to `Option` and `Result` values.
pub trait Context<T> {
    /// Fails with the given message.
    fn context<C: std::fmt::Display>(self, context: C) -> Result<T>;

    /// Fails with a lazily built message.
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_source() {
        let err = std::fs::read("/definitely/not/here")
            .fs_context("reading", "/definitely/not/here")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("reading /definitely/not/here:"), "{msg}");
        assert!(!err.is_external());
    }

    #[test]
    fn tool_failures_are_external() {
        let err = Error::Timeout { tool: "otool".into(), seconds: 5 };
        assert!(err.is_external());
        assert_eq!(err.to_string(), "otool did not finish within 5s");
    }

    #[test]
    fn option_context() {
        let none: Option<u8> = None;
        let err = none.context("missing value").unwrap_err();
        assert_eq!(err.to_string(), "missing value");
    }
}
