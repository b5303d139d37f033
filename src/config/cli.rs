use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem storage rooted at `base_path`. Absolute paths bypass the root.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(Path::new(path))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("nested/out/report.csv", b"a,b\n").await.unwrap();
        let data = storage.read_file("nested/out/report.csv").await.unwrap();
        assert_eq!(data, b"a,b\n");
        assert!(dir.path().join("nested/out/report.csv").exists());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.read_file("missing.csv").await.is_err());
    }
}
