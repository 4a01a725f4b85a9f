//! macOS DMG disk image creator.
//!
//! Wraps the finished `.app` into a bzip2-compressed (`UDBZ`) HFS+ image
//! with the native `hdiutil` tool.

mod creation;

pub use creation::{create_dmg, dmg_path};

use crate::bundler::{error::Result, settings::Settings};
use std::path::PathBuf;

/// Bundles the finished `.app` as a disk image.
///
/// Returns the image path, or `None` when disk images are disabled.
pub async fn bundle_project(settings: &Settings) -> Result<Option<PathBuf>> {
    if !settings.dmg().enabled {
        log::debug!("Disk image disabled, skipping");
        return Ok(None);
    }
    log::info!("Creating DMG for {}", settings.product_name());
    create_dmg(settings).await.map(Some)
}
