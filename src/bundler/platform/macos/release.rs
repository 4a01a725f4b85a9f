//! Release feed lookup for the image-io plugin packages.
//!
//! The feed is a GitHub releases listing. Assets are gzip-compressed tarballs
//! that unpack into a single top-level directory.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    utils::http::HttpClient,
};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

/// A release as reported by the feed.
#[derive(Clone, Debug, Deserialize)]
pub struct Release {
    /// Git tag the release was cut from.
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release.
#[derive(Clone, Debug, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Releases ordered by preference.
#[derive(Debug, Default)]
pub struct ReleaseIndex {
    releases: Vec<Release>,
}

impl ReleaseIndex {
    /// Ranks `releases`: published before drafts, stable before prereleases,
    /// newest first, undated last.
    pub fn from_releases(mut releases: Vec<Release>) -> Self {
        releases.sort_by_key(|r| (r.draft, r.prerelease, r.published_at.is_none(), Reverse(r.published_at)));
        Self { releases }
    }

    /// Downloads and ranks the release listing at `url`.
    pub async fn fetch(client: &HttpClient, url: &str) -> Result<Self> {
        let releases: Vec<Release> = client.get_json(url).await?;
        log::debug!("Release feed lists {} releases", releases.len());
        Ok(Self::from_releases(releases))
    }

    /// Releases in rank order.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// First asset named exactly `name`, walking releases in rank order.
    pub fn find_asset(&self, name: &str) -> Result<(&Release, &ReleaseAsset)> {
        self.releases
            .iter()
            .find_map(|r| r.assets.iter().find(|a| a.name == name).map(|a| (r, a)))
            .ok_or_else(|| Error::AssetNotPublished { name: name.to_string() })
    }
}

/// Downloads `name` from the best release and unpacks it into `dest`.
///
/// Returns `dest/<unpacked_dir>`.
pub async fn fetch_and_unpack(
    client: &HttpClient,
    index: &ReleaseIndex,
    name: &str,
    unpacked_dir: &str,
    dest: &Path,
) -> Result<PathBuf> {
    let (release, asset) = index.find_asset(name)?;
    log::info!("Fetching {} from release {}", asset.name, release.tag_name);
    let bytes = client.download(&asset.browser_download_url).await?;
    unpack_tarball(bytes, dest).await?;
    Ok(dest.join(unpacked_dir))
}

/// Extracts a `.tar.gz` archive held in memory into `dest`.
pub async fn unpack_tarball(bytes: Vec<u8>, dest: &Path) -> Result<()> {
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
        archive.unpack(&dest).fs_context("unpacking archive into", &dest)
    })
    .await
    .map_err(|e| Error::GenericError(format!("unpack task failed: {}", e)))?
}
