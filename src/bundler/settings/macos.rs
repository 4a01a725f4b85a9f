//! macOS bundle, launcher and disk image settings.

use std::path::PathBuf;

/// Release feed listing the image-io plugin packages.
pub const IMAGEIO_RELEASES_URL: &str =
    "https://api.github.com/repos/artraweditor/ART-imageio/releases";

/// Install location of the optional metadata-extraction tool.
pub const EXIFTOOL_PREFIX: &str = "/usr/local/bin";

/// Library prefixes provided by the operating system; never bundled.
pub const SYSTEM_LIBRARY_PREFIXES: [&str; 2] = ["/System/", "/usr/lib/"];

/// GUI launcher flavour.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum GuiMode {
    /// Module caches in a fresh temporary directory, no message bus.
    Direct,
    /// Private D-Bus session daemon on a per-user socket, shared between launches.
    ForkDaemon,
}

/// Absolute paths of the system utilities invoked by the generated scripts.
///
/// The scripts never rely on `PATH` lookup for these.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ScriptTools {
    /// `dirname`
    pub dirname: String,
    /// `realpath`
    pub realpath: String,
    /// `mkdir`
    pub mkdir: String,
    /// `rm`
    pub rm: String,
    /// `rmdir`
    pub rmdir: String,
    /// `mktemp`
    pub mktemp: String,
    /// `tee`
    pub tee: String,
    /// `sleep`
    pub sleep: String,
    /// Command that exits 0 when the unix socket given as its last argument
    /// accepts connections.
    pub socket_probe: String,
}

impl Default for ScriptTools {
    fn default() -> Self {
        Self {
            dirname: "/usr/bin/dirname".into(),
            realpath: "/bin/realpath".into(),
            mkdir: "/bin/mkdir".into(),
            rm: "/bin/rm".into(),
            rmdir: "/bin/rmdir".into(),
            mktemp: "/usr/bin/mktemp".into(),
            tee: "/usr/bin/tee".into(),
            sleep: "/bin/sleep".into(),
            socket_probe: "/usr/bin/nc -z -U".into(),
        }
    }
}

/// Launcher generation settings.
#[derive(Clone, Debug)]
pub struct LauncherSettings {
    /// Interpreter for the generated scripts and the trampoline's `execv`.
    pub shell: PathBuf,

    /// Compile the native trampoline in front of the GUI script.
    pub use_trampoline: bool,

    /// GUI launcher flavour.
    pub gui_mode: GuiMode,

    /// Run the GUI under sanitizer-friendly options and tee its output to `~/ART.log`.
    pub debug: bool,

    /// Utilities referenced by the scripts.
    pub tools: ScriptTools,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/zsh"),
            use_trampoline: false,
            gui_mode: GuiMode::Direct,
            debug: false,
            tools: ScriptTools::default(),
        }
    }
}

/// Extra assets requested on the command line.
#[derive(Clone, Debug, Default)]
pub struct AssetSettings {
    /// Bundle exiftool from [`EXIFTOOL_PREFIX`] when it is installed.
    pub exiftool: bool,

    /// Local directory with the image-io plugin resources.
    pub imageio: Option<PathBuf>,

    /// Local directory with the image-io plugin binaries.
    pub imageio_bin: Option<PathBuf>,

    /// Fetch missing image-io parts from the release feed.
    pub imageio_download: bool,

    /// Bearer token for the release feed.
    pub github_token: Option<String>,

    /// Lens database directory; `None` skips it.
    pub lensfun_dir: Option<PathBuf>,
}

/// macOS DMG disk image configuration.
#[derive(Clone, Debug)]
pub struct DmgSettings {
    /// Create the disk image after the bundle is finished.
    pub enabled: bool,

    /// Volume name and file stem of the image (`<name>.dmg`).
    pub name: String,
}

impl Default for DmgSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "ART".into(),
        }
    }
}
