//! Command line argument parsing and validation.
//!
//! Arguments are parsed with clap, checked by [`Args::validate`] and then
//! turned into bundler [`Settings`].

use crate::bundler::{
    self, AssetSettings, DmgSettings, GuiMode, LauncherSettings, Settings, SettingsBuilder,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Lens database location relative to the home directory.
const LENSFUN_DB: &str = ".local/share/lensfun/updates/version_1";

/// macOS application bundle assembler for ART
#[derive(Parser, Debug)]
#[command(
    name = "art_bundler",
    version,
    about = "Assembles a self-contained ART.app from an ART build tree",
    long_about = "Assembles a self-contained ART.app from an ART build tree.

Copies the build tree, bundles its non-system dylibs and GTK resources, writes
Info.plist, the icon and the launcher scripts, and optionally packs the result
into a disk image.

Usage:
  cd build && art_bundler -o /tmp/dist
  art_bundler --build-dir build -o /tmp/dist -I -l -n

Set GITHUB_AUTH to authenticate release feed requests made by --imageio-download."
)]
pub struct Args {
    /// Output directory; the bundle is created as <DIR>/ART.app
    #[arg(short = 'o', long, value_name = "DIR")]
    pub outdir: PathBuf,

    /// Bundle exiftool from /usr/local/bin when it is installed
    #[arg(short = 'e', long)]
    pub exiftool: bool,

    /// Directory with the image-io plugin resources
    #[arg(short = 'i', long, value_name = "DIR")]
    pub imageio: Option<PathBuf>,

    /// Directory with the image-io plugin binaries
    #[arg(short = 'b', long, value_name = "DIR")]
    pub imageio_bin: Option<PathBuf>,

    /// Download the image-io plugins that were not given locally
    #[arg(short = 'I', long)]
    pub imageio_download: bool,

    /// Debug-level logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Extra directory searched for @rpath/ dependencies (repeatable)
    #[arg(short = 'r', long = "rpath", value_name = "DIR")]
    pub rpaths: Vec<PathBuf>,

    /// Dependency prefix; detected from the GTK dependency when omitted
    #[arg(short = 'p', long, value_name = "DIR")]
    pub prefix: Option<PathBuf>,

    /// Do not create the disk image
    #[arg(short = 'n', long)]
    pub no_dmg: bool,

    /// Disk image volume and file name
    #[arg(short = 'd', long, value_name = "NAME", default_value = "ART")]
    pub dmg_name: String,

    /// Interpreter for the launcher scripts
    #[arg(short = 's', long, value_name = "PATH", default_value = "/bin/zsh")]
    pub shell: PathBuf,

    /// Front the GUI script with a compiled launcher
    #[arg(short = 'l', long, overrides_with = "no_launcher")]
    pub use_launcher: bool,

    /// Start the GUI script directly (default)
    #[arg(short = 'L', long, overrides_with = "use_launcher")]
    pub no_launcher: bool,

    /// GUI launcher mode; fork-daemon with the compiled launcher, direct otherwise
    #[arg(long, value_enum, value_name = "MODE")]
    pub gui_mode: Option<GuiMode>,

    /// GUI launcher that logs to ~/ART.log
    #[arg(long)]
    pub debug: bool,

    /// ART build tree containing Contents/MacOS/ART
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub build_dir: PathBuf,

    /// Seconds an external tool may run before it is killed
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub tool_timeout: u64,

    /// Seconds a release feed request may take
    #[arg(long, value_name = "SECS", default_value_t = 120)]
    pub network_timeout: u64,

    /// Bearer token for the release feed
    #[arg(long, env = "GITHUB_AUTH", hide = true, hide_env_values = true)]
    pub github_auth: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.dmg_name.is_empty() || self.dmg_name.contains('/') {
            return Err(format!("Invalid dmg name: {:?}", self.dmg_name));
        }
        if !self.shell.is_absolute() {
            return Err(format!(
                "Shell must be an absolute path: {}",
                self.shell.display()
            ));
        }
        if self.tool_timeout == 0 || self.network_timeout == 0 {
            return Err("Timeouts must be at least one second".to_string());
        }
        for dir in self.imageio.iter().chain(&self.imageio_bin) {
            if !dir.is_dir() {
                log::warn!("{} is not a directory, it will be skipped", dir.display());
            }
        }
        Ok(())
    }

    /// GUI launcher mode after applying the launcher default.
    pub fn effective_gui_mode(&self) -> GuiMode {
        self.gui_mode.unwrap_or(if self.use_launcher {
            GuiMode::ForkDaemon
        } else {
            GuiMode::Direct
        })
    }

    /// Converts the arguments into bundler settings.
    pub fn into_settings(self) -> bundler::Result<Settings> {
        let gui_mode = self.effective_gui_mode();
        let mut builder = SettingsBuilder::new()
            .build_dir(&self.build_dir)
            .out_dir(&self.outdir)
            .rpaths(self.rpaths)
            .asset_settings(AssetSettings {
                exiftool: self.exiftool,
                imageio: self.imageio,
                imageio_bin: self.imageio_bin,
                imageio_download: self.imageio_download,
                github_token: self.github_auth.filter(|t| !t.is_empty()),
                lensfun_dir: dirs::home_dir().map(|home| home.join(LENSFUN_DB)),
            })
            .launcher_settings(LauncherSettings {
                shell: self.shell,
                use_trampoline: self.use_launcher,
                gui_mode,
                debug: self.debug,
                ..Default::default()
            })
            .dmg_settings(DmgSettings {
                enabled: !self.no_dmg,
                name: self.dmg_name,
            })
            .tool_timeout(Duration::from_secs(self.tool_timeout))
            .network_timeout(Duration::from_secs(self.network_timeout));
        if let Some(prefix) = &self.prefix {
            builder = builder.prefix(prefix);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("art_bundler").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["-o", "/tmp/dist"]);
        assert_eq!(args.dmg_name, "ART");
        assert_eq!(args.shell, PathBuf::from("/bin/zsh"));
        assert_eq!(args.build_dir, PathBuf::from("."));
        assert!(!args.use_launcher);
        assert_eq!(args.effective_gui_mode(), GuiMode::Direct);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn outdir_is_required() {
        assert!(Args::try_parse_from(["art_bundler", "-n"]).is_err());
    }

    #[test]
    fn launcher_flags_override_each_other() {
        let args = parse(&["-o", "x", "-l", "-L"]);
        assert!(!args.use_launcher);
        let args = parse(&["-o", "x", "-L", "-l"]);
        assert!(args.use_launcher);
        assert_eq!(args.effective_gui_mode(), GuiMode::ForkDaemon);

        let args = parse(&["-o", "x", "-l", "--gui-mode", "direct"]);
        assert_eq!(args.effective_gui_mode(), GuiMode::Direct);
    }

    #[test]
    fn rpaths_repeat() {
        let args = parse(&["-o", "x", "-r", "/a", "--rpath", "/b"]);
        assert_eq!(args.rpaths, [PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn relative_shell_is_rejected() {
        let args = parse(&["-o", "x", "-s", "zsh"]);
        assert!(args.validate().unwrap_err().contains("absolute"));
        let args = parse(&["-o", "x", "-d", "a/b"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn settings_follow_flags() {
        let settings = parse(&["-o", "/tmp/dist", "-n", "-d", "ART-1.0", "-p", "/opt/local", "-l", "--debug"])
            .into_settings()
            .unwrap();
        assert!(!settings.dmg().enabled);
        assert_eq!(settings.dmg().name, "ART-1.0");
        assert_eq!(settings.prefix(), Some(std::path::Path::new("/opt/local")));
        assert!(settings.launcher().use_trampoline);
        assert!(settings.launcher().debug);
        assert_eq!(settings.bundle_dir(), PathBuf::from("/tmp/dist/ART.app"));
    }
}
