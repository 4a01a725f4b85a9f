//! macOS application bundle assembler for ART.
//!
//! Turns a freshly built `ART` tree into a self-contained `ART.app`: native
//! library dependencies, GTK resources, bundle metadata and launcher scripts,
//! optionally packed into a disk image.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
