//! Extra resources copied into the bundle after the build tree.
//!
//! The plan is declarative: each [`AssetEntry`] names a destination inside the
//! bundle and a source, which is either a local file or directory or a
//! release-feed archive that is unpacked into scratch space first.

use super::release::{self, ReleaseIndex};
use crate::bundler::{
    error::{Error, Result},
    settings::{EXIFTOOL_PREFIX, Settings},
    utils::{fs, http::HttpClient},
};
use std::path::{Path, PathBuf};

/// Where an asset comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssetSource {
    /// File or directory on the build host.
    Local(PathBuf),
    /// Release-feed tarball.
    Remote {
        /// Exact asset file name in the feed.
        asset_name: String,
        /// Top-level directory the tarball unpacks to.
        unpacked_dir: String,
    },
}

/// One item of the asset plan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetEntry {
    /// Destination directory relative to the bundle root.
    pub dest: PathBuf,
    pub source: AssetSource,
    /// Name inside `dest`; defaults to the source's file name.
    pub rename: Option<String>,
}

impl AssetEntry {
    fn local(dest: &str, source: impl Into<PathBuf>) -> Self {
        Self {
            dest: PathBuf::from(dest),
            source: AssetSource::Local(source.into()),
            rename: None,
        }
    }

    fn renamed(mut self, name: &str) -> Self {
        self.rename = Some(name.to_string());
        self
    }

    fn remote(dest: &str, asset_name: String, unpacked_dir: String, name: &str) -> Self {
        Self {
            dest: PathBuf::from(dest),
            source: AssetSource::Remote { asset_name, unpacked_dir },
            rename: Some(name.to_string()),
        }
    }

    /// True if the source still has to be downloaded.
    pub fn is_remote(&self) -> bool {
        matches!(self.source, AssetSource::Remote { .. })
    }

    /// Name of the copy inside `dest`.
    pub fn target_name(&self) -> Option<String> {
        if let Some(name) = &self.rename {
            return Some(name.clone());
        }
        match &self.source {
            AssetSource::Local(path) => path.file_name().map(|n| n.to_string_lossy().into_owned()),
            AssetSource::Remote { unpacked_dir, .. } => Some(unpacked_dir.clone()),
        }
    }
}

/// Outcome of [`collect`].
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Bundle paths that were written.
    pub copied: Vec<PathBuf>,
    /// Sources that did not exist.
    pub skipped: Vec<PathBuf>,
}

/// Builds the asset plan for a bundle whose dependencies live under `prefix`.
///
/// Glob patterns are expanded here; a pattern that matches nothing contributes
/// no entries.
pub fn asset_plan(settings: &Settings, prefix: &Path) -> Result<Vec<AssetEntry>> {
    let p = |rel: &str| prefix.join(rel);
    let mut plan = Vec::new();

    for pattern in [
        "lib/gdk-pixbuf-2.0/2.10.0/loaders/*.so",
        "lib/gtk-3.0/3*/immodules/*.so",
    ] {
        let pattern = p(pattern);
        let mut matched = 0;
        for path in glob::glob(&pattern.to_string_lossy())? {
            match path {
                Ok(path) => {
                    plan.push(AssetEntry::local("Contents/Frameworks", path));
                    matched += 1;
                }
                Err(e) => log::warn!("unreadable glob match: {}", e),
            }
        }
        log::debug!("{} matched {} files", pattern.display(), matched);
    }

    for tool in ["bin/gtk-query-immodules-3.0", "bin/gdk-pixbuf-query-loaders", "bin/dbus-daemon"] {
        plan.push(AssetEntry::local("Contents/Resources", p(tool)));
    }
    plan.push(AssetEntry::local("Contents/Resources/dbus-1", p("share/dbus-1/session.conf")));
    for item in ["scalable", "index.theme", "cursors"] {
        plan.push(AssetEntry::local(
            "Contents/Resources/share/icons/Adwaita",
            p("share/icons/Adwaita").join(item),
        ));
    }
    plan.push(AssetEntry::local("Contents/Resources/share/icons", p("share/icons/hicolor")));
    plan.push(AssetEntry::local(
        "Contents/Resources/share/glib-2.0/schemas",
        p("share/glib-2.0/schemas/gschemas.compiled"),
    ));

    let assets = settings.assets();
    if let Some(lensfun) = &assets.lensfun_dir {
        plan.push(AssetEntry::local("Contents/Resources", lensfun).renamed("lensfun"));
    }
    plan.push(AssetEntry::local("Contents/Resources/etc", p("etc/gtk-3.0")));
    plan.push(AssetEntry::local("Contents/Resources", p("etc/fonts/fonts.conf")));

    let exiftool = Path::new(EXIFTOOL_PREFIX).join("exiftool");
    if assets.exiftool {
        if exiftool.exists() {
            plan.push(AssetEntry::local("Contents/Resources/exiftool", exiftool));
            plan.push(AssetEntry::local("Contents/Resources/exiftool", Path::new(EXIFTOOL_PREFIX).join("lib")));
        } else {
            log::warn!("{} not installed, not bundling exiftool", exiftool.display());
        }
    }

    if let Some(dir) = &assets.imageio {
        plan.push(AssetEntry::local("Contents/Resources", dir).renamed("imageio"));
    } else if assets.imageio_download {
        plan.push(AssetEntry::remote(
            "Contents/Resources",
            "ART-imageio.tar.gz".into(),
            "ART-imageio".into(),
            "imageio",
        ));
    }

    if let Some(dir) = &assets.imageio_bin {
        plan.push(AssetEntry::local("Contents/Resources/imageio", dir).renamed("bin"));
    } else if assets.imageio_download {
        let stem = format!("ART-imageio-bin-macOS-{}", settings.arch().release_suffix());
        plan.push(AssetEntry::remote(
            "Contents/Resources/imageio",
            format!("{stem}.tar.gz"),
            stem,
            "bin",
        ));
    }

    Ok(plan)
}

/// Replaces remote entries with local ones by downloading them into `scratch`.
///
/// The release listing is fetched once, and only if the plan has a remote entry.
pub async fn materialize_remote(
    plan: Vec<AssetEntry>,
    client: &HttpClient,
    feed_url: &str,
    scratch: &Path,
) -> Result<Vec<AssetEntry>> {
    if !plan.iter().any(AssetEntry::is_remote) {
        return Ok(plan);
    }
    let index = ReleaseIndex::fetch(client, feed_url).await?;

    let mut out = Vec::with_capacity(plan.len());
    for entry in plan {
        if !entry.is_remote() {
            out.push(entry);
            continue;
        }
        let AssetSource::Remote { asset_name, unpacked_dir } = &entry.source else {
            continue;
        };
        let dir = release::fetch_and_unpack(client, &index, asset_name, unpacked_dir, scratch).await?;
        out.push(AssetEntry {
            rename: entry.target_name(),
            dest: entry.dest,
            source: AssetSource::Local(dir),
        });
    }

    Ok(out)
}

/// Copies every entry of `plan` into `bundle_root`.
///
/// Missing sources are skipped with a notice and listed in the report.
pub async fn collect(bundle_root: &Path, plan: &[AssetEntry]) -> Result<CollectReport> {
    let mut report = CollectReport::default();

    for entry in plan {
        let AssetSource::Local(src) = &entry.source else {
            return Err(Error::GenericError(format!(
                "asset for {} was not downloaded",
                entry.dest.display()
            )));
        };
        log::debug!("copying: {}", src.display());
        if !src.exists() {
            log::warn!("SKIPPING non-existing: {}", src.display());
            report.skipped.push(src.clone());
            continue;
        }
        let Some(name) = entry.target_name() else {
            log::warn!("SKIPPING unnamed source: {}", src.display());
            report.skipped.push(src.clone());
            continue;
        };

        let dest = bundle_root.join(&entry.dest).join(name);
        if src.is_dir() {
            fs::copy_dir(src, &dest).await?;
        } else {
            fs::copy_file(src, &dest).await?;
        }
        report.copied.push(dest);
    }

    log::info!(
        "Copied {} extra resources ({} skipped)",
        report.copied.len(),
        report.skipped.len()
    );
    Ok(report)
}
