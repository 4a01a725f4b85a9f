//! Configuration structures for bundling operations.
//!
//! Everything derived from the command line lives in [`Settings`] and is
//! passed explicitly to each step.

mod arch;
mod builder;
mod core;
mod macos;
mod package;

pub use arch::Arch;
pub use builder::{DEFAULT_NETWORK_TIMEOUT, DEFAULT_TOOL_TIMEOUT, SettingsBuilder};
pub use core::Settings;
pub use macos::{
    AssetSettings, DmgSettings, EXIFTOOL_PREFIX, GuiMode, IMAGEIO_RELEASES_URL, LauncherSettings,
    SYSTEM_LIBRARY_PREFIXES, ScriptTools,
};
pub use package::PackageSettings;
