//! Core DMG creation logic using hdiutil.

use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    utils::process,
};
use std::path::PathBuf;
use tokio::fs::remove_file;

/// Location of the image: `<out>/<dmg name>.dmg`.
pub fn dmg_path(settings: &Settings) -> PathBuf {
    settings.out_dir().join(format!("{}.dmg", settings.dmg().name))
}

/// hdiutil arguments, relative to the output directory.
pub(super) fn hdiutil_args(settings: &Settings) -> Vec<String> {
    let name = &settings.dmg().name;
    vec![
        "create".into(),
        "-format".into(),
        "UDBZ".into(),
        "-fs".into(),
        "HFS+".into(),
        "-srcdir".into(),
        settings.package().app_dir_name(),
        "-volname".into(),
        name.clone(),
        format!("{name}.dmg"),
    ]
}

/// Create DMG from the bundle using hdiutil
///
/// hdiutil runs inside the output directory so the image contains the bundle
/// under its plain name. An existing image of the same name is replaced.
pub async fn create_dmg(settings: &Settings) -> Result<PathBuf> {
    let dmg_path = dmg_path(settings);
    let bundle = settings.bundle_dir();
    if !bundle.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a bundle directory",
            bundle.display()
        )));
    }

    // Remove old DMG if exists
    if dmg_path.exists() {
        remove_file(&dmg_path).await?;
    }

    log::info!("Creating dmg in {} ...", dmg_path.display());
    let hdiutil = process::find_tool("hdiutil")?;
    process::run_tool(
        &hdiutil,
        hdiutil_args(settings),
        Some(settings.out_dir()),
        settings.tool_timeout(),
    )
    .await?;

    log::info!("✓ Created DMG: {}", dmg_path.display());
    Ok(dmg_path)
}
