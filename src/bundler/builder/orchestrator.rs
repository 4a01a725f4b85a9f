//! Main bundler orchestration and coordination.
//!
//! The [`Bundler`] runs every step strictly in sequence:
//!
//! 1. verify the build tree and output location
//! 2. copy the build tree to `<out>/ART.app`
//! 3. bundle native library dependencies
//! 4. in a scratch directory: collect extra assets, write `Info.plist`, build
//!    the icon and, when enabled, the launcher trampoline
//! 5. write GTK settings and the lens database option
//! 6. hide the real executables behind launcher scripts
//! 7. optionally create the disk image

use super::checksum::{artifact_size, calculate_sha256};
use crate::bundler::{
    BundledArtifact, PackageType, Result, Settings,
    error::{Error, ErrorExt},
    platform::macos::{
        assets::{self, AssetEntry},
        dmg,
        dylib::{self, LibraryInspector, Otool},
        icon, info_plist,
        launcher::{cli, gui, trampoline},
    },
    utils::{fs, http::HttpClient},
};
use std::path::{Path, PathBuf};

/// `Contents/Resources/share/gtk-3.0/settings.ini` contents.
const GTK_SETTINGS: &str = "[Settings]\ngtk-primary-button-warps-slider = true\ngtk-overlay-scrolling = true\n";

/// Appended to `Contents/Resources/options`.
const LENSFUN_OPTIONS: &str = "\n[Lensfun]\nDBDirectory=lensfun\n";

/// Main bundler orchestrator.
///
/// Generic over the [`LibraryInspector`] so the dependency walk can run
/// without `otool`.
///
/// # Examples
///
/// ```no_run
/// use art_bundler::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> art_bundler::bundler::Result<()> {
/// let artifacts = Bundler::new(settings).bundle().await?;
/// println!("Created {} artifacts", artifacts.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler<I: LibraryInspector = Otool> {
    settings: Settings,
    inspector: I,
}

impl Bundler<Otool> {
    /// Creates a bundler that inspects libraries with `otool`.
    pub fn new(settings: Settings) -> Self {
        let inspector = Otool::new(settings.tool_timeout());
        Self { settings, inspector }
    }
}

impl<I: LibraryInspector> Bundler<I> {
    /// Creates a bundler with a custom library inspector.
    pub fn with_inspector(settings: Settings, inspector: I) -> Self {
        Self { settings, inspector }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds the `.app` and, unless disabled, the disk image.
    ///
    /// # Returns
    ///
    /// One [`BundledArtifact`] per produced package, the bundle first.
    pub async fn bundle(&self) -> Result<Vec<BundledArtifact>> {
        let app = self.bundle_app().await?;
        let mut artifacts = vec![artifact(PackageType::MacOsBundle, app).await?];

        if let Some(image) = dmg::bundle_project(&self.settings).await? {
            artifacts.push(artifact(PackageType::Dmg, image).await?);
        }
        Ok(artifacts)
    }

    /// Assembles `<out>/ART.app` and returns its path.
    pub async fn bundle_app(&self) -> Result<PathBuf> {
        let settings = &self.settings;
        self.check_locations()?;

        let bundle = settings.bundle_dir();
        log::info!(
            "copying {} to {}",
            settings.build_dir().display(),
            bundle.display()
        );
        fs::create_dir_all(settings.out_dir(), false).await?;
        fs::copy_dir(settings.build_dir(), &bundle).await?;

        let prefix = match settings.prefix() {
            Some(prefix) => prefix.to_path_buf(),
            None => {
                let exe = bundle.join("Contents/MacOS").join(settings.product_name());
                let prefix = dylib::detect_prefix(&self.inspector, &exe).await?;
                log::info!("Using prefix {}", prefix.display());
                prefix
            }
        };
        dylib::bundle_dylib_dependencies(&self.inspector, settings, &prefix).await?;

        self.scratch_phase(&bundle, &prefix).await?;

        let resources = bundle.join("Contents/Resources");
        fs::write_file(&resources.join("share/gtk-3.0/settings.ini"), GTK_SETTINGS).await?;
        fs::append_file(&resources.join("options"), LENSFUN_OPTIONS).await?;

        install_launchers(&bundle, settings).await?;
        log::info!("✓ Created {}", bundle.display());
        Ok(bundle)
    }

    fn check_locations(&self) -> Result<()> {
        let settings = &self.settings;
        let exe = settings.built_executable();
        if !exe.is_file() {
            return Err(Error::MissingExecutable { path: exe });
        }

        let bundle = settings.bundle_dir();
        if bundle.exists() {
            return Err(Error::BundleExists { path: bundle });
        }

        let build = settings
            .build_dir()
            .canonicalize()
            .fs_context("resolving build directory", settings.build_dir())?;
        let out = fs::resolve_lenient(settings.out_dir())?;
        if out.starts_with(&build) {
            return Err(Error::GenericError(format!(
                "output directory {} is inside the build directory {}",
                out.display(),
                build.display()
            )));
        }
        Ok(())
    }

    /// Steps that need scratch space. The directory is removed on return.
    async fn scratch_phase(&self, bundle: &Path, prefix: &Path) -> Result<()> {
        let settings = &self.settings;
        let scratch = tempfile::Builder::new()
            .prefix("art-bundle")
            .tempdir()
            .fs_context("creating scratch directory in", std::env::temp_dir())?;

        let mut plan = assets::asset_plan(settings, prefix)?;
        if plan.iter().any(AssetEntry::is_remote) {
            let client = HttpClient::new(
                settings.network_timeout(),
                settings.assets().github_token.clone(),
            )?;
            plan = assets::materialize_remote(plan, &client, settings.release_feed_url(), scratch.path())
                .await?;
        }
        assets::collect(bundle, &plan).await?;

        let package = settings.package();
        let version = info_plist::read_version(bundle, package).await;
        info_plist::write_info_plist(bundle, package, &version).await?;
        icon::build_icon_set(bundle, scratch.path(), package, settings.tool_timeout()).await?;

        if settings.launcher().use_trampoline {
            trampoline::build_trampoline(bundle, scratch.path(), settings).await?;
        }
        Ok(())
    }
}

/// Hides the real executables and writes the launchers into `Contents/MacOS`.
///
/// With the trampoline enabled, `<product>_launch` must already be in place;
/// it takes the product name and the GUI script moves aside. Returns the
/// launchers marked executable.
async fn install_launchers(bundle: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    let package = settings.package();
    let macos = bundle.join("Contents/MacOS");

    fs::rename(
        &macos.join(&package.product_name),
        &macos.join(package.hidden_gui_binary()),
    )
    .await?;
    let cli_binary = macos.join(&package.cli_name);
    if cli_binary.exists() {
        fs::rename(&cli_binary, &macos.join(package.hidden_cli_binary())).await?;
    } else {
        log::warn!("{} not found, CLI launcher will be dangling", cli_binary.display());
    }

    let mut launchers = Vec::with_capacity(3);
    if settings.launcher().use_trampoline {
        let front = macos.join(&package.product_name);
        fs::rename(&macos.join(package.trampoline_name()), &front).await?;
        launchers.push(front);
    }
    launchers.push(gui::write_gui_launcher(bundle, settings).await?);
    launchers.push(cli::write_cli_launcher(bundle, settings).await?);

    for launcher in &launchers {
        fs::set_executable(launcher).await?;
    }
    Ok(launchers)
}

async fn artifact(package_type: PackageType, path: PathBuf) -> Result<BundledArtifact> {
    let size = artifact_size(&path).await?;
    let checksum = calculate_sha256(&path).await?;
    Ok(BundledArtifact {
        package_type,
        paths: vec![path],
        size,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::platform::macos::dylib::tests::FakeInspector;
    use crate::bundler::settings::{DmgSettings, LauncherSettings, SettingsBuilder};
    use std::os::unix::fs::PermissionsExt;

    struct Fixture {
        _tmp: tempfile::TempDir,
        build: PathBuf,
        out: PathBuf,
        prefix: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let build = tmp.path().join("build");
        let out = tmp.path().join("dist");
        let prefix = tmp.path().join("prefix");

        let macos = build.join("Contents/MacOS");
        std::fs::create_dir_all(&macos).unwrap();
        std::fs::write(macos.join("ART"), "gui").unwrap();
        std::fs::write(macos.join("ART-cli"), "cli").unwrap();
        std::fs::create_dir_all(build.join("Contents/Resources")).unwrap();
        std::fs::write(build.join("Contents/Resources/options"), "[General]\n").unwrap();

        std::fs::create_dir_all(prefix.join("lib")).unwrap();
        std::fs::write(prefix.join("lib/libgtk-3.0.dylib"), "gtk").unwrap();
        std::fs::write(prefix.join("lib/libglib-2.0.0.dylib"), "glib").unwrap();
        std::fs::create_dir_all(prefix.join("etc/fonts")).unwrap();
        std::fs::write(prefix.join("etc/fonts/fonts.conf"), "<fontconfig/>").unwrap();

        Fixture { _tmp: tmp, build, out, prefix }
    }

    fn settings(f: &Fixture, launcher: LauncherSettings) -> Settings {
        SettingsBuilder::new()
            .build_dir(&f.build)
            .out_dir(&f.out)
            .prefix(&f.prefix)
            .launcher_settings(launcher)
            .dmg_settings(DmgSettings {
                enabled: false,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    fn inspector(f: &Fixture) -> FakeInspector {
        let gtk = f.prefix.join("lib/libgtk-3.0.dylib");
        let glib = f.prefix.join("lib/libglib-2.0.0.dylib");
        FakeInspector::default()
            .with(
                f.out.join("ART.app/Contents/MacOS/ART"),
                &[
                    gtk.to_str().unwrap(),
                    "/usr/lib/libSystem.B.dylib",
                    "/System/Library/Frameworks/Cocoa.framework/Versions/A/Cocoa",
                ],
            )
            .with(gtk.clone(), &[glib.to_str().unwrap()])
    }

    #[tokio::test]
    async fn assembles_bundle_without_build_description() {
        let f = fixture();
        let bundler = Bundler::with_inspector(settings(&f, LauncherSettings::default()), inspector(&f));
        let artifacts = bundler.bundle().await.unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].package_type, PackageType::MacOsBundle);
        assert_eq!(artifacts[0].checksum.len(), 64);

        let app = f.out.join("ART.app");
        let contents = app.join("Contents");
        assert!(contents.join("Frameworks/libgtk-3.0.dylib").is_file());
        assert!(contents.join("Frameworks/libglib-2.0.0.dylib").is_file());
        assert!(!contents.join("Frameworks/libSystem.B.dylib").exists());
        assert!(contents.join("Resources/fonts.conf").is_file());

        let plist = plist::Value::from_file(contents.join("Info.plist")).unwrap();
        let version = plist
            .as_dictionary()
            .and_then(|d| d.get("CFBundleVersion"))
            .and_then(plist::Value::as_string)
            .unwrap();
        assert_eq!(version, "UNKNOWN");

        let macos = contents.join("MacOS");
        assert_eq!(std::fs::read_to_string(macos.join(".ART.bin")).unwrap(), "gui");
        assert_eq!(std::fs::read_to_string(macos.join(".ART-cli.bin")).unwrap(), "cli");

        let cli = std::fs::read_to_string(macos.join("ART-cli")).unwrap();
        assert!(cli.contains("exec \"$d/MacOS/.ART-cli.bin\" \"$@\""));
        let gui = std::fs::read_to_string(macos.join("ART")).unwrap();
        assert!(gui.starts_with("#!/bin/zsh\n"));
        for launcher in ["ART", "ART-cli"] {
            let mode = std::fs::metadata(macos.join(launcher)).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755, "{launcher}");
        }

        let options = std::fs::read_to_string(contents.join("Resources/options")).unwrap();
        assert_eq!(options, "[General]\n\n[Lensfun]\nDBDirectory=lensfun\n");
        let gtk = std::fs::read_to_string(contents.join("Resources/share/gtk-3.0/settings.ini")).unwrap();
        assert!(gtk.contains("gtk-overlay-scrolling = true"));
    }

    #[tokio::test]
    async fn prefix_is_detected_when_not_given() {
        let f = fixture();
        let settings = SettingsBuilder::new()
            .build_dir(&f.build)
            .out_dir(&f.out)
            .dmg_settings(DmgSettings {
                enabled: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        Bundler::with_inspector(settings, inspector(&f))
            .bundle_app()
            .await
            .unwrap();
        assert!(f.out.join("ART.app/Contents/Resources/fonts.conf").is_file());
    }

    #[tokio::test]
    async fn missing_cli_binary_still_writes_launcher() {
        let f = fixture();
        std::fs::remove_file(f.build.join("Contents/MacOS/ART-cli")).unwrap();
        let bundler = Bundler::with_inspector(settings(&f, LauncherSettings::default()), inspector(&f));
        let app = bundler.bundle_app().await.unwrap();
        assert!(app.join("Contents/MacOS/ART-cli").is_file());
        assert!(!app.join("Contents/MacOS/.ART-cli.bin").exists());
    }

    #[tokio::test]
    async fn trampoline_takes_the_product_name() {
        let f = fixture();
        let settings = settings(
            &f,
            LauncherSettings {
                use_trampoline: true,
                ..Default::default()
            },
        );
        let bundle = f.out.join("ART.app");
        let macos = bundle.join("Contents/MacOS");
        std::fs::create_dir_all(&macos).unwrap();
        std::fs::write(macos.join("ART"), "gui").unwrap();
        std::fs::write(macos.join("ART-cli"), "cli").unwrap();
        std::fs::write(macos.join("ART_launch"), "trampoline").unwrap();

        let launchers = install_launchers(&bundle, &settings).await.unwrap();

        assert_eq!(launchers, [macos.join("ART"), macos.join(".ART.sh"), macos.join("ART-cli")]);
        assert_eq!(std::fs::read_to_string(macos.join("ART")).unwrap(), "trampoline");
        assert_eq!(std::fs::read_to_string(macos.join(".ART.bin")).unwrap(), "gui");
        assert_eq!(std::fs::read_to_string(macos.join(".ART-cli.bin")).unwrap(), "cli");
        assert!(!macos.join("ART_launch").exists());
        let script = std::fs::read_to_string(macos.join(".ART.sh")).unwrap();
        assert!(script.contains("\"$d/MacOS/.ART.bin\" \"$@\""));
        for launcher in &launchers {
            let mode = std::fs::metadata(launcher).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755, "{}", launcher.display());
        }
    }

    #[tokio::test]
    async fn missing_executable_is_reported() {
        let f = fixture();
        std::fs::remove_file(f.build.join("Contents/MacOS/ART")).unwrap();
        let bundler = Bundler::with_inspector(settings(&f, LauncherSettings::default()), inspector(&f));
        let err = bundler.bundle().await.unwrap_err();
        assert!(matches!(err, Error::MissingExecutable { .. }));
        assert!(err.to_string().contains("not found! Please run this tool from the build directory"));
        assert!(!f.out.exists());
    }

    #[tokio::test]
    async fn existing_bundle_is_not_overwritten() {
        let f = fixture();
        std::fs::create_dir_all(f.out.join("ART.app")).unwrap();
        let bundler = Bundler::with_inspector(settings(&f, LauncherSettings::default()), inspector(&f));
        assert!(matches!(bundler.bundle().await.unwrap_err(), Error::BundleExists { .. }));
    }

    #[tokio::test]
    async fn output_inside_build_tree_is_rejected() {
        let f = fixture();
        let settings = SettingsBuilder::new()
            .build_dir(&f.build)
            .out_dir(f.build.join("dist/new"))
            .prefix(&f.prefix)
            .build()
            .unwrap();
        let err = Bundler::with_inspector(settings, inspector(&f))
            .bundle()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("inside the build directory"), "{err}");
    }
}
