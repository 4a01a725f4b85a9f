//! `.icns` icon set generation with `iconutil`.
//!
//! The build tree ships square PNG logos in `Contents/Resources/images`. They
//! are staged into an `.iconset` directory under Apple's naming scheme and
//! compiled into a single `.icns` file.

use crate::bundler::{
    error::Result,
    settings::PackageSettings,
    utils::{fs, process},
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Logo sizes shipped in the build tree, excluding the 1024 px retina logo.
const LOGO_SIZES: [u32; 6] = [16, 32, 64, 128, 256, 512];

/// Source logo file name to iconset member name, in staging order.
pub fn iconset_plan(product_name: &str) -> Vec<(String, String)> {
    let mut plan = Vec::new();
    for size in LOGO_SIZES {
        let logo = format!("{product_name}-logo-{size}.png");
        plan.push((logo.clone(), format!("icon_{size}x{size}.png")));
        if size > LOGO_SIZES[0] {
            let half = size / 2;
            plan.push((logo, format!("icon_{half}x{half}@2x.png")));
        }
    }
    plan.push((format!("{product_name}-logo-1024.png"), "icon_512x512@2x.png".to_string()));
    plan
}

/// Builds `Contents/Resources/<name>.icns` from the bundle's logo images.
///
/// Missing logos are skipped with a warning. When no logo could be staged
/// the icon is not compiled and `None` is returned. A failing `iconutil` is an
/// error.
pub async fn build_icon_set(
    bundle_root: &Path,
    scratch: &Path,
    package: &PackageSettings,
    timeout: Duration,
) -> Result<Option<PathBuf>> {
    let images = bundle_root.join("Contents/Resources/images");
    let iconset_name = format!("{}.iconset", package.product_name);
    let iconset = scratch.join(&iconset_name);
    fs::create_dir_all(&iconset, true).await?;

    let mut staged = 0;
    for (logo, member) in iconset_plan(&package.product_name) {
        let src = images.join(&logo);
        if !src.is_file() {
            log::warn!("{} not found, icon will lack {}", src.display(), member);
            continue;
        }
        fs::copy_file(&src, &iconset.join(member)).await?;
        staged += 1;
    }

    if staged == 0 {
        log::warn!("no logo images in {}, skipping {}", images.display(), package.icns_name());
        return Ok(None);
    }

    log::info!("Compiling {} from {} images", package.icns_name(), staged);
    let iconutil = process::find_tool("iconutil")?;
    process::run_tool(&iconutil, ["-c", "icns", iconset_name.as_str()], Some(scratch), timeout).await?;

    let dest = bundle_root.join("Contents/Resources").join(package.icns_name());
    fs::copy_file(&scratch.join(package.icns_name()), &dest).await?;
    Ok(Some(dest))
}
