//! macOS `.app` bundle steps.
//!
//! - [`dylib`] / [`otool`] - native library closure and its inspector
//! - [`assets`] / [`release`] - extra resources and remote plugin archives
//! - [`info_plist`] / [`icon`] - bundle metadata
//! - [`launcher`] - launcher scripts and the native trampoline
//! - [`dmg`] - disk image packaging

pub mod assets;
pub mod dmg;
pub mod dylib;
pub mod icon;
pub mod info_plist;
pub mod launcher;
pub mod otool;
pub mod release;
