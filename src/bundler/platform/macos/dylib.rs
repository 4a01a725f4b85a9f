//! Dynamic library dependency discovery and bundling for macOS .app bundles.
//!
//! Walks the transitive closure of non-system dylib dependencies of the
//! bundle's executables and copies them into `Contents/Frameworks`. The
//! executables locate them at runtime through `DYLD_LIBRARY_PATH`, which the
//! launcher scripts point at that directory.

use super::otool::{self, DependencyLine};
use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    utils::{fs, process},
};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Install-name token resolved against the configured search paths.
pub const RPATH_TOKEN: &str = "@rpath/";

/// Reports the direct dylib dependencies of a Mach-O file.
#[allow(async_fn_in_trait)]
pub trait LibraryInspector {
    /// Direct dependencies of `path`, in load-command order.
    async fn dependencies(&self, path: &Path) -> Result<Vec<DependencyLine>>;
}

/// [`LibraryInspector`] backed by `otool -L`.
#[derive(Clone, Debug)]
pub struct Otool {
    timeout: Duration,
}

impl Otool {
    /// Creates an inspector whose invocations are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl LibraryInspector for Otool {
    async fn dependencies(&self, path: &Path) -> Result<Vec<DependencyLine>> {
        if !path.exists() {
            log::warn!("{} not found, skipping dependency scan", path.display());
            return Ok(Vec::new());
        }
        let otool = process::find_tool("otool")?;
        let output = process::run_tool(
            &otool,
            [std::ffi::OsStr::new("-L"), path.as_os_str()],
            None,
            self.timeout,
        )
        .await?;
        otool::parse_dependencies(path, &String::from_utf8_lossy(&output.stdout))
    }
}

/// Result of a dependency walk.
#[derive(Debug, Default)]
pub struct DependencyClosure {
    libraries: BTreeSet<PathBuf>,
    visited: HashSet<PathBuf>,
}

impl DependencyClosure {
    /// Non-system libraries reachable from the roots, sorted.
    pub fn libraries(&self) -> impl Iterator<Item = &Path> {
        self.libraries.iter().map(PathBuf::as_path)
    }

    /// Number of libraries in the closure.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// True when no library needs bundling.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// True if `path` was handed to the inspector.
    pub fn was_visited(&self, path: &Path) -> bool {
        self.visited.contains(path)
    }
}

/// Determines if a dylib path is a system library that should NOT be bundled.
pub fn is_system_dylib(path: &Path, system_prefixes: &[String]) -> bool {
    let path = path.to_string_lossy();
    system_prefixes.iter().any(|p| path.starts_with(p.as_str()))
}

/// Resolves an `@rpath/` install name against `search_paths`.
///
/// The first directory that contains the library wins. Names without the
/// token, and tokens no directory satisfies, are returned unchanged.
pub fn resolve_install_name(install_name: &str, search_paths: &[PathBuf]) -> PathBuf {
    if let Some(rel) = install_name.strip_prefix(RPATH_TOKEN) {
        for dir in search_paths {
            let candidate = dir.join(rel);
            if candidate.exists() {
                return candidate;
            }
        }
    }
    PathBuf::from(install_name)
}

/// Computes the transitive closure of non-system dependencies of `roots`.
///
/// Each distinct path is inspected at most once, so cyclic dependency graphs
/// terminate.
pub async fn resolve<I: LibraryInspector>(
    inspector: &I,
    roots: &[PathBuf],
    search_paths: &[PathBuf],
    system_prefixes: &[String],
) -> Result<DependencyClosure> {
    let mut closure = DependencyClosure::default();
    let mut to_process: Vec<PathBuf> = roots.iter().rev().cloned().collect();

    while let Some(path) = to_process.pop() {
        if !closure.visited.insert(path.clone()) {
            continue;
        }
        log::debug!("computing dependencies for: {}", path.display());

        for dep in inspector.dependencies(&path).await? {
            let lib = resolve_install_name(&dep.install_name, search_paths);
            if is_system_dylib(&lib, system_prefixes) {
                continue;
            }
            log::debug!("   {}", lib.display());
            closure.libraries.insert(lib.clone());
            to_process.push(lib);
        }
    }

    Ok(closure)
}

/// Derives the package prefix from the main executable's GTK dependency.
///
/// `/opt/local/lib/libgtk-3.0.dylib` yields `/opt/local`.
pub async fn detect_prefix<I: LibraryInspector>(inspector: &I, executable: &Path) -> Result<PathBuf> {
    inspector
        .dependencies(executable)
        .await?
        .into_iter()
        .find(|dep| dep.install_name.contains("libgtk-3.0"))
        .and_then(|dep| {
            Path::new(&dep.install_name)
                .parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        })
        .ok_or_else(|| Error::PrefixNotFound {
            executable: executable.to_path_buf(),
        })
}

/// Bundles all dynamic library dependencies of the bundle's executables.
///
/// The walk starts at the main executable and the private D-Bus daemon.
/// Libraries that cannot be copied are reported and skipped. Returns the paths
/// copied into `Contents/Frameworks`.
pub async fn bundle_dylib_dependencies<I: LibraryInspector>(
    inspector: &I,
    settings: &Settings,
    prefix: &Path,
) -> Result<Vec<PathBuf>> {
    let bundle_dir = settings.bundle_dir();
    let frameworks_dir = bundle_dir.join("Contents/Frameworks");
    fs::create_dir_all(&frameworks_dir, false).await?;

    let roots = [
        bundle_dir.join("Contents/MacOS").join(settings.product_name()),
        prefix.join("bin/dbus-daemon"),
    ];

    log::info!("Discovering dylib dependencies for {}", settings.product_name());
    let closure = resolve(
        inspector,
        &roots,
        settings.rpaths(),
        settings.system_prefixes(),
    )
    .await?;

    let mut copied = Vec::with_capacity(closure.len());
    for lib in closure.libraries() {
        let Some(name) = lib.file_name() else {
            log::warn!("{} has no file name, skipping", lib.display());
            continue;
        };
        let dest = frameworks_dir.join(name);
        log::debug!("copying: {}", lib.display());
        match fs::copy_file(lib, &dest).await {
            Ok(()) => copied.push(dest),
            Err(e) => log::warn!("{} could not be copied, skipping ({})", lib.display(), e),
        }
    }

    log::info!("Bundled {} unique dylibs into Frameworks/", copied.len());
    Ok(copied)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory dependency graph standing in for otool.
    #[derive(Default)]
    pub(crate) struct FakeInspector {
        graph: HashMap<PathBuf, Vec<String>>,
        pub(crate) calls: RefCell<Vec<PathBuf>>,
    }

    impl FakeInspector {
        pub(crate) fn with(mut self, path: impl Into<PathBuf>, deps: &[&str]) -> Self {
            self.graph
                .insert(path.into(), deps.iter().map(|d| d.to_string()).collect());
            self
        }
    }

    impl LibraryInspector for FakeInspector {
        async fn dependencies(&self, path: &Path) -> Result<Vec<DependencyLine>> {
            self.calls.borrow_mut().push(path.to_path_buf());
            Ok(self
                .graph
                .get(path)
                .into_iter()
                .flatten()
                .map(|name| DependencyLine {
                    install_name: name.clone(),
                    compatibility_version: "1.0.0".into(),
                    current_version: "1.0.0".into(),
                    flags: Vec::new(),
                })
                .collect())
        }
    }

    fn system() -> Vec<String> {
        vec!["/System/".into(), "/usr/lib/".into()]
    }

    #[tokio::test]
    async fn cycles_are_visited_once() {
        let inspector = FakeInspector::default()
            .with("/app/ART", &["/opt/lib/liba.dylib", "/usr/lib/libSystem.B.dylib"])
            .with("/opt/lib/liba.dylib", &["/opt/lib/libb.dylib"])
            .with("/opt/lib/libb.dylib", &["/opt/lib/liba.dylib", "/System/Library/Frameworks/Cocoa"]);

        let closure = resolve(&inspector, &[PathBuf::from("/app/ART")], &[], &system())
            .await
            .unwrap();

        let libs: Vec<_> = closure.libraries().collect();
        assert_eq!(libs, [Path::new("/opt/lib/liba.dylib"), Path::new("/opt/lib/libb.dylib")]);

        let calls = inspector.calls.borrow();
        let unique: HashSet<_> = calls.iter().collect();
        assert_eq!(calls.len(), unique.len(), "a path was inspected twice: {calls:?}");
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn system_prefixes_are_never_included_or_walked() {
        let inspector = FakeInspector::default()
            .with("/app/ART", &["/usr/lib/libc++.1.dylib"])
            .with("/usr/lib/libc++.1.dylib", &["/opt/lib/hidden.dylib"]);

        let closure = resolve(&inspector, &[PathBuf::from("/app/ART")], &[], &system())
            .await
            .unwrap();
        assert!(closure.is_empty());
        assert!(!closure.was_visited(Path::new("/usr/lib/libc++.1.dylib")));
    }

    #[tokio::test]
    async fn shared_roots_are_walked_once() {
        let inspector = FakeInspector::default()
            .with("/app/ART", &["/opt/lib/libglib.dylib"])
            .with("/opt/bin/dbus-daemon", &["/opt/lib/libglib.dylib", "/opt/lib/libexpat.dylib"]);

        let roots = [PathBuf::from("/app/ART"), PathBuf::from("/opt/bin/dbus-daemon")];
        let closure = resolve(&inspector, &roots, &[], &system()).await.unwrap();
        assert_eq!(closure.len(), 2);
        assert_eq!(inspector.calls.borrow().len(), 4);
    }

    #[test]
    fn rpath_picks_first_directory_that_has_the_library() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        let third = tmp.path().join("third");
        for dir in [&first, &second, &third] {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(second.join("libomp.dylib"), "").unwrap();
        std::fs::write(third.join("libomp.dylib"), "").unwrap();

        let search = [first, second.clone(), third];
        assert_eq!(resolve_install_name("@rpath/libomp.dylib", &search), second.join("libomp.dylib"));
    }

    #[test]
    fn unresolved_rpath_token_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let search = [tmp.path().to_path_buf()];
        assert_eq!(
            resolve_install_name("@rpath/libmissing.dylib", &search),
            PathBuf::from("@rpath/libmissing.dylib")
        );
        assert_eq!(
            resolve_install_name("/opt/lib/libz.dylib", &search),
            PathBuf::from("/opt/lib/libz.dylib")
        );
    }

    #[tokio::test]
    async fn rpath_dependencies_are_resolved_during_the_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let lib = tmp.path().join("libomp.dylib");
        std::fs::write(&lib, "").unwrap();

        let inspector = FakeInspector::default()
            .with("/app/ART", &["@rpath/libomp.dylib", "@rpath/libgone.dylib"]);
        let closure = resolve(
            &inspector,
            &[PathBuf::from("/app/ART")],
            &[tmp.path().to_path_buf()],
            &system(),
        )
        .await
        .unwrap();

        assert!(closure.was_visited(&lib));
        let libs: Vec<_> = closure.libraries().map(Path::to_path_buf).collect();
        assert!(libs.contains(&lib));
        assert!(libs.contains(&PathBuf::from("@rpath/libgone.dylib")));
    }

    #[tokio::test]
    async fn uncopyable_libraries_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let lib = tmp.path().join("prefix/lib/libintl.8.dylib");
        std::fs::create_dir_all(lib.parent().unwrap()).unwrap();
        std::fs::write(&lib, "intl").unwrap();
        let gone = tmp.path().join("prefix/lib/libgone.dylib");

        let settings = crate::bundler::settings::SettingsBuilder::new()
            .build_dir(tmp.path().join("build"))
            .out_dir(tmp.path().join("dist"))
            .build()
            .unwrap();
        let exe = settings.bundle_dir().join("Contents/MacOS/ART");
        let inspector = FakeInspector::default().with(
            exe,
            &[lib.to_str().unwrap(), gone.to_str().unwrap(), "@rpath/libunresolved.dylib"],
        );

        let copied = bundle_dylib_dependencies(&inspector, &settings, &tmp.path().join("prefix"))
            .await
            .unwrap();
        let frameworks = settings.bundle_dir().join("Contents/Frameworks");
        assert_eq!(copied, [frameworks.join("libintl.8.dylib")]);
        assert!(!frameworks.join("libgone.dylib").exists());
    }

    #[tokio::test]
    async fn prefix_comes_from_the_gtk_dependency() {
        let inspector = FakeInspector::default()
            .with("/app/ART", &["/opt/local/lib/libglib-2.0.0.dylib", "/opt/local/lib/libgtk-3.0.dylib"]);
        let prefix = detect_prefix(&inspector, Path::new("/app/ART")).await.unwrap();
        assert_eq!(prefix, PathBuf::from("/opt/local"));

        let err = detect_prefix(&FakeInspector::default(), Path::new("/app/ART"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PrefixNotFound { .. }));
    }
}
