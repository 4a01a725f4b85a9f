//! macOS application bundle assembly.
//!
//! - [`builder`] - the [`Bundler`] orchestrator and artifact checksums
//! - [`platform`] - macOS specific steps (dependencies, assets, metadata, launchers, DMG)
//! - [`settings`] - configuration threaded through every step
//! - [`utils`] - filesystem, HTTP and child-process helpers

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::{BundledArtifact, Bundler};
pub use error::{Error, Result};
pub use platform::PackageType;
pub use settings::{
    Arch, AssetSettings, DmgSettings, GuiMode, LauncherSettings, PackageSettings, ScriptTools, Settings,
    SettingsBuilder,
};
