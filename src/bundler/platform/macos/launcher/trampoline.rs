//! Native trampoline in front of the GUI script.
//!
//! A tiny C program that takes the product name in `Contents/MacOS` and
//! `execv`s the configured shell on `.ART.sh`, forwarding all arguments.

use super::{TemplateData, render_blocks};
use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{fs, process},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Renders the trampoline's C source.
pub fn render_source(settings: &Settings) -> Result<String> {
    render_blocks(&["trampoline_c"], &TemplateData::new(settings, &[]))
}

/// Compiles the trampoline into `Contents/MacOS/<product>_launch`.
///
/// The source is written to `scratch`. A compiler failure is an error.
pub async fn build_trampoline(bundle_root: &Path, scratch: &Path, settings: &Settings) -> Result<PathBuf> {
    let product = settings.product_name();
    let source = scratch.join(format!("{product}_launcher.c"));
    fs::write_file(&source, render_source(settings)?).await?;

    let output = bundle_root
        .join("Contents/MacOS")
        .join(settings.package().trampoline_name());
    log::info!("Building launcher for {}", product);

    let clang = process::find_tool("clang")?;
    process::run_tool(
        &clang,
        [source.as_os_str(), OsStr::new("-o"), output.as_os_str()],
        None,
        settings.tool_timeout(),
    )
    .await?;
    Ok(output)
}
