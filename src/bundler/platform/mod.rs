//! Platform-specific bundling steps.

pub mod macos;

/// Kind of artifact produced by a bundling run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PackageType {
    /// The `.app` directory tree.
    MacOsBundle,
    /// Compressed disk image containing the `.app`.
    Dmg,
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageType::MacOsBundle => write!(f, "app"),
            PackageType::Dmg => write!(f, "dmg"),
        }
    }
}
