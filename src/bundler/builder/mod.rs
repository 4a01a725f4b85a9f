//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that turns a built
//! tree into a self-contained `.app` and, optionally, a disk image.
//!
//! # Example
//!
//! ```no_run
//! use art_bundler::bundler::{Bundler, SettingsBuilder};
//!
//! # async fn example() -> art_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .build_dir(".")
//!     .out_dir("/tmp/dist")
//!     .build()?;
//!
//! let artifacts = Bundler::new(settings).bundle().await?;
//!
//! for artifact in artifacts {
//!     println!("Created: {} ({} bytes)", artifact.package_type, artifact.size);
//!     println!("SHA256: {}", artifact.checksum);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! - [`checksum`] - SHA256 checksum and size of artifacts
//! - [`orchestrator`] - the [`Bundler`] itself

mod checksum;
mod orchestrator;

pub use orchestrator::Bundler;

use crate::bundler::PackageType;
use std::path::PathBuf;

/// A produced artifact.
#[derive(Clone, Debug)]
pub struct BundledArtifact {
    /// What was produced.
    pub package_type: PackageType,
    /// Paths making up the artifact.
    pub paths: Vec<PathBuf>,
    /// Total size in bytes; for directories, the sum of all regular files.
    pub size: u64,
    /// Hex-encoded SHA-256 of the first path.
    pub checksum: String,
}
