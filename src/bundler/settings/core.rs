//! Core Settings struct and implementations.

use super::{Arch, AssetSettings, DmgSettings, LauncherSettings, PackageSettings};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings for a bundling run.
///
/// Constructed once from the command line via [`SettingsBuilder`] and passed by
/// reference to every step.
///
/// # Examples
///
/// ```no_run
/// use art_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> art_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .build_dir("/src/ART/build")
///     .out_dir("/tmp/dist")
///     .build()?;
/// assert!(settings.bundle_dir().ends_with("ART.app"));
/// # Ok(())
/// # }
/// ```
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    package: PackageSettings,
    build_dir: PathBuf,
    out_dir: PathBuf,
    prefix: Option<PathBuf>,
    rpaths: Vec<PathBuf>,
    system_prefixes: Vec<String>,
    assets: AssetSettings,
    launcher: LauncherSettings,
    dmg: DmgSettings,
    release_feed_url: String,
    tool_timeout: Duration,
    network_timeout: Duration,
    arch: Arch,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the product metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// The finished build tree the bundle is copied from.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Directory that receives the `.app` and the `.dmg`.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// `<out_dir>/<Product>.app`.
    pub fn bundle_dir(&self) -> PathBuf {
        self.out_dir.join(self.package.app_dir_name())
    }

    /// Path of the GUI executable inside the build tree.
    pub fn built_executable(&self) -> PathBuf {
        self.build_dir
            .join("Contents/MacOS")
            .join(&self.package.product_name)
    }

    /// Explicit dependency prefix, if one was given.
    pub fn prefix(&self) -> Option<&Path> {
        self.prefix.as_deref()
    }

    /// Directories substituted for `@rpath/`, in lookup order.
    pub fn rpaths(&self) -> &[PathBuf] {
        &self.rpaths
    }

    /// Library prefixes that are never bundled.
    pub fn system_prefixes(&self) -> &[String] {
        &self.system_prefixes
    }

    /// Extra asset options.
    pub fn assets(&self) -> &AssetSettings {
        &self.assets
    }

    /// Launcher generation options.
    pub fn launcher(&self) -> &LauncherSettings {
        &self.launcher
    }

    /// Disk image options.
    pub fn dmg(&self) -> &DmgSettings {
        &self.dmg
    }

    /// Release list endpoint for the image-io plugins.
    pub fn release_feed_url(&self) -> &str {
        &self.release_feed_url
    }

    /// Upper bound for every child process.
    pub fn tool_timeout(&self) -> Duration {
        self.tool_timeout
    }

    /// Upper bound for every HTTP request.
    pub fn network_timeout(&self) -> Duration {
        self.network_timeout
    }

    /// Host architecture.
    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        package: PackageSettings,
        build_dir: PathBuf,
        out_dir: PathBuf,
        prefix: Option<PathBuf>,
        rpaths: Vec<PathBuf>,
        system_prefixes: Vec<String>,
        assets: AssetSettings,
        launcher: LauncherSettings,
        dmg: DmgSettings,
        release_feed_url: String,
        tool_timeout: Duration,
        network_timeout: Duration,
        arch: Arch,
    ) -> Self {
        Self {
            package,
            build_dir,
            out_dir,
            prefix,
            rpaths,
            system_prefixes,
            assets,
            launcher,
            dmg,
            release_feed_url,
            tool_timeout,
            network_timeout,
            arch,
        }
    }
}
