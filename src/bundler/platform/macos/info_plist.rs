//! `Contents/Info.plist` generation.

use crate::bundler::{
    error::{Error, Result},
    settings::PackageSettings,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Version used when the build description carries none.
pub const UNKNOWN_VERSION: &str = "UNKNOWN";

#[derive(Serialize)]
struct InfoPlist {
    #[serde(rename = "CFBundleExecutable")]
    executable: String,
    #[serde(rename = "CFBundleGetInfoString")]
    get_info_string: String,
    #[serde(rename = "CFBundleIconFile")]
    icon_file: String,
    #[serde(rename = "CFBundleIdentifier")]
    identifier: String,
    #[serde(rename = "CFBundleInfoDictionaryVersion")]
    info_dictionary_version: &'static str,
    #[serde(rename = "CFBundleName")]
    name: String,
    #[serde(rename = "CFBundlePackageType")]
    package_type: &'static str,
    #[serde(rename = "CFBundleShortVersionString")]
    short_version: String,
    #[serde(rename = "CFBundleSignature")]
    signature: &'static str,
    #[serde(rename = "CFBundleVersion")]
    version: String,
    #[serde(rename = "CFBundleAllowMixedLocalizations")]
    allow_mixed_localizations: bool,
    #[serde(rename = "NSHighResolutionCapable")]
    high_resolution_capable: bool,
    #[serde(rename = "NSHumanReadableCopyright")]
    copyright: String,
    #[serde(rename = "LSMultipleInstancesProhibited")]
    multiple_instances_prohibited: bool,
    #[serde(rename = "NSDesktopFolderUsageDescription")]
    desktop_usage: String,
    #[serde(rename = "NSDocumentsFolderUsageDescription")]
    documents_usage: String,
    #[serde(rename = "NSDownloadsFolderUsageDescription")]
    downloads_usage: String,
    #[serde(rename = "NSRemovableVolumesUsageDescription")]
    removable_volumes_usage: String,
    #[serde(rename = "CFBundleDocumentTypes")]
    document_types: Vec<DocumentType>,
}

#[derive(Serialize)]
struct DocumentType {
    #[serde(rename = "CFBundleTypeRole")]
    role: &'static str,
    #[serde(rename = "LSItemContentTypes")]
    content_types: Vec<String>,
}

impl InfoPlist {
    fn new(package: &PackageSettings, version: &str) -> Self {
        let name = &package.product_name;
        let folder = |what: &str| format!("{name} requires permission to access {what}.");
        Self {
            executable: name.clone(),
            get_info_string: format!("{version}, {}", package.copyright),
            icon_file: package.icns_name(),
            identifier: package.identifier.clone(),
            info_dictionary_version: "6.0",
            name: name.clone(),
            package_type: "APPL",
            short_version: version.to_string(),
            signature: "????",
            version: version.to_string(),
            allow_mixed_localizations: true,
            high_resolution_capable: true,
            copyright: package.copyright.clone(),
            multiple_instances_prohibited: true,
            desktop_usage: folder("the Desktop folder"),
            documents_usage: folder("the Documents folder"),
            downloads_usage: folder("the Downloads folder"),
            removable_volumes_usage: folder("files on Removable Volumes"),
            document_types: vec![DocumentType {
                role: "Viewer",
                content_types: package.document_types.clone(),
            }],
        }
    }
}

/// Reads the version from the bundle's build description.
///
/// The version is the last word of the first line starting with `Version: `.
pub async fn read_version(bundle_root: &Path, package: &PackageSettings) -> String {
    let path = bundle_root.join(&package.build_info_file);
    let Ok(text) = tokio::fs::read_to_string(&path).await else {
        log::warn!("{} not readable, version is {}", path.display(), UNKNOWN_VERSION);
        return UNKNOWN_VERSION.to_string();
    };
    text.lines()
        .find(|line| line.starts_with("Version: "))
        .and_then(|line| line.split_whitespace().last())
        .unwrap_or(UNKNOWN_VERSION)
        .to_string()
}

/// Writes `Contents/Info.plist` for `version`.
pub async fn write_info_plist(bundle_root: &Path, package: &PackageSettings, version: &str) -> Result<PathBuf> {
    let path = bundle_root.join("Contents/Info.plist");
    log::info!("Writing {} (version {})", path.display(), version);

    let plist = InfoPlist::new(package, version);
    let target = path.clone();
    tokio::task::spawn_blocking(move || plist::to_file_xml(&target, &plist))
        .await
        .map_err(|e| Error::GenericError(format!("writing {} failed: {}", path.display(), e)))??;
    Ok(path)
}
