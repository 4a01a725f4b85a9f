//! Builder for constructing Settings.

use super::{
    Arch, AssetSettings, DmgSettings, IMAGEIO_RELEASES_URL, LauncherSettings, PackageSettings,
    SYSTEM_LIBRARY_PREFIXES, Settings,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default upper bound for a child process.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(600);

/// Default upper bound for an HTTP request.
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(120);

/// Builder for constructing [`Settings`].
///
/// Only the build and output directories are required; everything else has
/// the defaults of a plain release build.
///
/// # Examples
///
/// ```no_run
/// use art_bundler::bundler::{DmgSettings, SettingsBuilder};
///
/// # fn example() -> art_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .build_dir(".")
///     .out_dir("/tmp/dist")
///     .prefix("/opt/local")
///     .rpath("/opt/local/lib/libomp")
///     .dmg_settings(DmgSettings { enabled: false, ..Default::default() })
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    package: Option<PackageSettings>,
    build_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    prefix: Option<PathBuf>,
    rpaths: Vec<PathBuf>,
    system_prefixes: Option<Vec<String>>,
    assets: AssetSettings,
    launcher: LauncherSettings,
    dmg: DmgSettings,
    release_feed_url: Option<String>,
    tool_timeout: Option<Duration>,
    network_timeout: Option<Duration>,
    arch: Option<Arch>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the product metadata.
    ///
    /// Default: [`PackageSettings::default`]
    pub fn package_settings(mut self, package: PackageSettings) -> Self {
        self.package = Some(package);
        self
    }

    /// Sets the finished build tree.
    ///
    /// # Required
    pub fn build_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory.
    ///
    /// # Required
    pub fn out_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the dependency prefix instead of deriving it from the executable.
    pub fn prefix<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.prefix = Some(path.as_ref().to_path_buf());
        self
    }

    /// Appends a directory to the `@rpath/` search list.
    pub fn rpath<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.rpaths.push(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the `@rpath/` search list.
    pub fn rpaths(mut self, paths: Vec<PathBuf>) -> Self {
        self.rpaths = paths;
        self
    }

    /// Replaces the system library prefixes.
    ///
    /// Default: [`SYSTEM_LIBRARY_PREFIXES`]
    pub fn system_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.system_prefixes = Some(prefixes);
        self
    }

    /// Sets the extra asset options.
    pub fn asset_settings(mut self, assets: AssetSettings) -> Self {
        self.assets = assets;
        self
    }

    /// Sets the launcher options.
    pub fn launcher_settings(mut self, launcher: LauncherSettings) -> Self {
        self.launcher = launcher;
        self
    }

    /// Sets the disk image options.
    pub fn dmg_settings(mut self, dmg: DmgSettings) -> Self {
        self.dmg = dmg;
        self
    }

    /// Overrides the release list endpoint.
    ///
    /// Default: [`IMAGEIO_RELEASES_URL`]
    pub fn release_feed_url(mut self, url: impl Into<String>) -> Self {
        self.release_feed_url = Some(url.into());
        self
    }

    /// Sets the child process timeout.
    ///
    /// Default: [`DEFAULT_TOOL_TIMEOUT`]
    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    /// Sets the HTTP request timeout.
    ///
    /// Default: [`DEFAULT_NETWORK_TIMEOUT`]
    pub fn network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = Some(timeout);
        self
    }

    /// Overrides the host architecture.
    pub fn arch(mut self, arch: Arch) -> Self {
        self.arch = Some(arch);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `build_dir` or `out_dir` is missing.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        Ok(Settings::new(
            self.package.unwrap_or_default(),
            self.build_dir.context("build_dir is required")?,
            self.out_dir.context("out_dir is required")?,
            self.prefix,
            self.rpaths,
            self.system_prefixes.unwrap_or_else(|| {
                SYSTEM_LIBRARY_PREFIXES.iter().map(|p| p.to_string()).collect()
            }),
            self.assets,
            self.launcher,
            self.dmg,
            self.release_feed_url
                .unwrap_or_else(|| IMAGEIO_RELEASES_URL.to_string()),
            self.tool_timeout.unwrap_or(DEFAULT_TOOL_TIMEOUT),
            self.network_timeout.unwrap_or(DEFAULT_NETWORK_TIMEOUT),
            self.arch.unwrap_or_else(Arch::host),
        ))
    }
}
