//! Product metadata embedded in the bundle.

/// Product identity written into `Info.plist` and used for file names
/// inside `Contents/MacOS`.
///
/// # Examples
///
/// ```no_run
/// use art_bundler::bundler::PackageSettings;
///
/// let package = PackageSettings::default();
/// assert_eq!(package.product_name, "ART");
/// assert_eq!(package.app_dir_name(), "ART.app");
/// ```
#[derive(Debug, Clone)]
pub struct PackageSettings {
    /// Product name; also the name of the GUI executable in `Contents/MacOS`.
    pub product_name: String,

    /// Name of the command line executable in `Contents/MacOS`.
    pub cli_name: String,

    /// Reverse-DNS bundle identifier (`CFBundleIdentifier`).
    pub identifier: String,

    /// Human readable copyright line.
    pub copyright: String,

    /// Build description file, relative to the bundle root, that carries the
    /// `Version: ` line.
    pub build_info_file: String,

    /// Uniform type identifiers the application can open.
    pub document_types: Vec<String>,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            product_name: "ART".into(),
            cli_name: "ART-cli".into(),
            identifier: "us.pixls.art.ART".into(),
            copyright: "Copyright © 2004-2010 Gábor Horváth, 2010-2019 RawTherapee Development Team, 2019-2024 Alberto Griggio".into(),
            build_info_file: "Contents/Resources/AboutThisBuild.txt".into(),
            document_types: vec!["public.image".into(), "public.directory".into()],
        }
    }
}

impl PackageSettings {
    /// Directory name of the bundle, e.g. `ART.app`.
    pub fn app_dir_name(&self) -> String {
        format!("{}.app", self.product_name)
    }

    /// Name of the icon file in `Contents/Resources`, e.g. `ART.icns`.
    pub fn icns_name(&self) -> String {
        format!("{}.icns", self.product_name)
    }

    /// Hidden name the real GUI executable is moved to.
    pub fn hidden_gui_binary(&self) -> String {
        hidden_binary(&self.product_name)
    }

    /// Hidden name the real CLI executable is moved to.
    pub fn hidden_cli_binary(&self) -> String {
        hidden_binary(&self.cli_name)
    }

    /// Hidden name of the GUI script when the native trampoline fronts it.
    pub fn hidden_gui_script(&self) -> String {
        format!(".{}.sh", self.product_name)
    }

    /// Name of the compiled trampoline before it takes the GUI executable's place.
    pub fn trampoline_name(&self) -> String {
        format!("{}_launch", self.product_name)
    }
}

fn hidden_binary(name: &str) -> String {
    format!(".{name}.bin")
}
