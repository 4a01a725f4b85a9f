//! Artifact checksum and size calculation.
//!
//! Files are hashed directly. Directory trees such as the `.app` bundle are
//! hashed over every regular file in sorted path order, each contributing its
//! bundle-relative path followed by its content. Symlinks are not followed.

use crate::{
    bail,
    bundler::{Error, Result, error::ErrorExt},
};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Hex-encoded SHA-256 of a file or directory tree.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<String> {
        let metadata = std::fs::symlink_metadata(&path).fs_context("reading metadata of", &path)?;
        let mut hasher = Sha256::new();
        if metadata.is_file() {
            hash_file(&mut hasher, &path)?;
        } else if metadata.is_dir() {
            for file in sorted_files(&path)? {
                hasher.update(file.strip_prefix(&path)?.to_string_lossy().as_bytes());
                hash_file(&mut hasher, &file)?;
            }
        } else {
            bail!("Path is neither file nor directory: {}", path.display());
        }
        Ok(format!("{:x}", hasher.finalize()))
    })
    .await
    .map_err(|e| Error::GenericError(format!("checksum task failed: {}", e)))?
}

/// Size in bytes of a file, or of all regular files below a directory.
pub async fn artifact_size(path: &Path) -> Result<u64> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<u64> {
        let metadata = std::fs::symlink_metadata(&path).fs_context("reading artifact metadata", &path)?;
        if !metadata.is_dir() {
            return Ok(metadata.len());
        }
        let mut size = 0;
        for file in sorted_files(&path)? {
            size += std::fs::symlink_metadata(&file)
                .fs_context("reading artifact metadata", &file)?
                .len();
        }
        Ok(size)
    })
    .await
    .map_err(|e| Error::GenericError(format!("size task failed: {}", e)))?
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn hash_file(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = std::fs::File::open(path).fs_context("opening file for hashing", path)?;
    let mut buffer = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buffer)
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_hash_matches_known_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.txt");
        std::fs::write(&path, "abc").unwrap();
        assert_eq!(
            calculate_sha256(&path).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(artifact_size(&path).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn directory_hash_depends_on_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        for dir in [&a, &b] {
            std::fs::create_dir_all(dir.join("Contents")).unwrap();
        }
        std::fs::write(a.join("Contents/x"), "same").unwrap();
        std::fs::write(b.join("Contents/y"), "same").unwrap();

        let ha = calculate_sha256(&a).await.unwrap();
        assert_eq!(ha, calculate_sha256(&a).await.unwrap());
        assert_ne!(ha, calculate_sha256(&b).await.unwrap());
        assert_eq!(artifact_size(&a).await.unwrap(), 4);
    }
}
