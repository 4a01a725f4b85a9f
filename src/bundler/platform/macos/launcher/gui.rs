//! GUI launcher script.

use super::{GUI_RESTORED_VARS, TemplateData, render_blocks};
use crate::bundler::{
    error::Result,
    settings::{GuiMode, Settings},
    utils::fs,
};
use std::path::{Path, PathBuf};

fn blocks(mode: GuiMode, debug: bool) -> Vec<&'static str> {
    let run = if debug { "run_gui_debug" } else { "run_gui" };
    match mode {
        GuiMode::Direct => vec![
            "shebang",
            "restore_env",
            "locate_relative",
            "gui_env",
            "direct_caches",
            run,
            "direct_cleanup",
        ],
        GuiMode::ForkDaemon => vec![
            "shebang",
            "restore_env",
            "locate_resolved",
            "gui_env",
            "bus_guard",
            run,
            "bus_cleanup",
        ],
    }
}

/// Renders the GUI script for the configured mode.
pub fn render_gui_script(settings: &Settings) -> Result<String> {
    let launcher = settings.launcher();
    let mut restore = GUI_RESTORED_VARS.to_vec();
    if launcher.gui_mode == GuiMode::ForkDaemon {
        restore.push("DBUS_SESSION_BUS_ADDRESS");
    }
    let data = TemplateData::new(settings, &restore);
    render_blocks(&blocks(launcher.gui_mode, launcher.debug), &data)
}

/// Name of the GUI script inside `Contents/MacOS`.
///
/// With the trampoline the script is hidden and the trampoline takes the
/// product name.
pub fn gui_script_name(settings: &Settings) -> String {
    if settings.launcher().use_trampoline {
        settings.package().hidden_gui_script()
    } else {
        settings.product_name().to_string()
    }
}

/// Writes the GUI script into `Contents/MacOS` of `bundle_root`.
pub async fn write_gui_launcher(bundle_root: &Path, settings: &Settings) -> Result<PathBuf> {
    let path = bundle_root.join("Contents/MacOS").join(gui_script_name(settings));
    log::info!(
        "Writing {:?} GUI launcher {}",
        settings.launcher().gui_mode,
        path.display()
    );
    fs::write_file(&path, render_gui_script(settings)?).await?;
    Ok(path)
}
