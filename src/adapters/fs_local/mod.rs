// Local filesystem adapter - File operations on the host filesystem

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::fs;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
pub struct FsLocalAdapter {
    preview_dir: TempDir,
}

impl FsLocalAdapter {
    /// Create new filesystem adapter with a fresh preview directory
    pub fn new() -> Result<Self, DomainError> {
        let preview_dir = tempfile::Builder::new()
            .prefix("cropper-")
            .tempdir()
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp directory: {}", e)))?;
        debug!(dir = %preview_dir.path().display(), "Created preview directory");
        Ok(Self { preview_dir })
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError> {
        Ok(fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false))
    }

    async fn file_size(&self, path: &Path) -> Result<u64, DomainError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }

    fn preview_dir(&self) -> &Path {
        self.preview_dir.path()
    }

    async fn ensure_parent_dir(&self, path: &Path) -> Result<(), DomainError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::FsFail(format!("Failed to create directory: {}", e))),
            _ => Ok(()),
        }
    }

    async fn create_sibling_temp(&self, target: &Path) -> Result<PathBuf, DomainError> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let suffix = target
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let temp = tempfile::Builder::new()
            .prefix(".cropper-")
            .suffix(&suffix)
            .tempfile_in(&dir)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp file: {}", e)))?;
        let path = temp
            .into_temp_path()
            .keep()
            .map_err(|e| DomainError::FsFail(format!("Failed to keep temp file: {}", e)))?;

        debug!(path = %path.display(), "Reserved sibling temp file");
        Ok(path)
    }

    async fn remove_file(&self, path: &Path) -> Result<(), DomainError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn replace_file(&self, replacement: &Path, target: &Path) -> Result<(), DomainError> {
        match fs::remove_file(target).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DomainError::ReplaceFail(e.to_string())),
        }
        fs::rename(replacement, target)
            .await
            .map_err(|e| DomainError::ReplaceFail(e.to_string()))?;
        debug!(target = %target.display(), "Replaced file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preview_dir_removed_on_drop() {
        let adapter = FsLocalAdapter::new().unwrap();
        let dir = adapter.preview_dir().to_path_buf();
        assert!(dir.is_dir());
        drop(adapter);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_sibling_temp_keeps_directory_and_extension() {
        let workdir = tempfile::TempDir::new().unwrap();
        let target = workdir.path().join("clip.mov");
        let adapter = FsLocalAdapter::new().unwrap();

        let temp = adapter.create_sibling_temp(&target).await.unwrap();
        assert_eq!(temp.parent(), Some(workdir.path()));
        assert_eq!(temp.extension().unwrap(), "mov");
        assert!(adapter.file_exists(&temp).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_file() {
        let workdir = tempfile::TempDir::new().unwrap();
        let target = workdir.path().join("clip.mp4");
        let replacement = workdir.path().join("new.mp4");
        std::fs::write(&target, b"old").unwrap();
        std::fs::write(&replacement, b"cropped").unwrap();

        let adapter = FsLocalAdapter::new().unwrap();
        adapter.replace_file(&replacement, &target).await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"cropped");
        assert!(!replacement.exists());
    }

    #[tokio::test]
    async fn test_replace_with_missing_file_fails() {
        let workdir = tempfile::TempDir::new().unwrap();
        let adapter = FsLocalAdapter::new().unwrap();
        let err = adapter
            .replace_file(&workdir.path().join("gone.mp4"), &workdir.path().join("x.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ReplaceFail(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let adapter = FsLocalAdapter::new().unwrap();
        adapter
            .remove_file(Path::new("/nonexistent/cropper/file.mp4"))
            .await
            .unwrap();
    }
}
