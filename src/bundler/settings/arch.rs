//! CPU architecture of the bundling host.

/// CPU architecture the bundle is assembled for.
///
/// The bundle always targets the host that runs the tool, since the libraries
/// copied into it come from the local prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arch {
    /// x86_64 - Intel Macs
    X86_64,
    /// AArch64 / ARM64 - Apple Silicon
    AArch64,
}

impl Arch {
    /// Architecture of the running process.
    pub fn host() -> Self {
        Self::from_machine(std::env::consts::ARCH)
    }

    /// Maps a machine name (`uname -m` style) to an architecture.
    ///
    /// Anything that is not x86_64 is treated as ARM64.
    pub fn from_machine(machine: &str) -> Self {
        if machine == "x86_64" {
            Arch::X86_64
        } else {
            Arch::AArch64
        }
    }

    /// Suffix used by the image-io plugin binary release assets.
    pub fn release_suffix(self) -> &'static str {
        match self {
            Arch::X86_64 => "x64",
            Arch::AArch64 => "arm64",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_names_map_to_release_suffixes() {
        assert_eq!(Arch::from_machine("x86_64").release_suffix(), "x64");
        assert_eq!(Arch::from_machine("aarch64").release_suffix(), "arm64");
        assert_eq!(Arch::from_machine("arm64").release_suffix(), "arm64");
    }
}
