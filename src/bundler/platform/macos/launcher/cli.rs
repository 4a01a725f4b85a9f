//! Command line launcher script.

use super::{CLI_RESTORED_VARS, TemplateData, render_blocks};
use crate::bundler::{error::Result, settings::Settings, utils::fs};
use std::path::{Path, PathBuf};

/// Renders the CLI script. It `exec`s the hidden binary, so arguments and the
/// exit status pass through unchanged.
pub fn render_cli_script(settings: &Settings) -> Result<String> {
    let data = TemplateData::new(settings, &CLI_RESTORED_VARS);
    render_blocks(&["shebang", "restore_env", "locate_resolved", "cli_env"], &data)
}

/// Writes `Contents/MacOS/<cli name>`.
pub async fn write_cli_launcher(bundle_root: &Path, settings: &Settings) -> Result<PathBuf> {
    let path = bundle_root
        .join("Contents/MacOS")
        .join(&settings.package().cli_name);
    log::info!("Writing CLI launcher {}", path.display());
    fs::write_file(&path, render_cli_script(settings)?).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{LauncherSettings, SettingsBuilder};
    use std::path::PathBuf;

    #[test]
    fn cli_script_execs_hidden_binary() {
        let settings = SettingsBuilder::new()
            .build_dir("/build")
            .out_dir("/dist")
            .launcher_settings(LauncherSettings {
                shell: PathBuf::from("/bin/bash"),
                ..Default::default()
            })
            .build()
            .unwrap();
        let script = render_cli_script(&settings).unwrap();

        let expected = r#"#!/bin/bash
export ART_restore_GIO_MODULE_DIR=$GIO_MODULE_DIR
export ART_restore_DYLD_LIBRARY_PATH=$DYLD_LIBRARY_PATH

d="$(/usr/bin/dirname "$(/bin/realpath "$0")")"
d="$(/bin/realpath "${d}/..")"
export DYLD_LIBRARY_PATH="$d/Frameworks"
export ART_EXIFTOOL_BASE_DIR="$d/Resources/exiftool"
exec "$d/MacOS/.ART-cli.bin" "$@"
"#;
        assert_eq!(script, expected);
    }
}
