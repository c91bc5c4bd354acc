use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// File-system collaborator used for component lookup and reads
#[async_trait]
pub trait SourceFs: Send + Sync {
    /// True when `path` is an existing regular file
    async fn exists(&self, path: &Path) -> bool;

    async fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// The real disk, through tokio's blocking-pool file API
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

#[async_trait]
impl SourceFs for DiskFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// In-memory file set, for hosts that hold unsaved buffers and for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<PathBuf, String>,
    unreadable: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// A file that exists but fails every read with `PermissionDenied`
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.insert(path.into());
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

#[async_trait]
impl SourceFs for MemoryFs {
    async fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.unreadable.contains(path)
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not readable", path.display()),
            ));
        }
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_fs_reports_existence_and_errors() {
        let fs = MemoryFs::new()
            .with_file("/p/a.jsx", "signals.a")
            .with_unreadable("/p/b.jsx");

        assert!(fs.exists(Path::new("/p/a.jsx")).await);
        assert!(fs.exists(Path::new("/p/b.jsx")).await);
        assert!(!fs.exists(Path::new("/p/c.jsx")).await);

        assert_eq!(fs.read_text(Path::new("/p/a.jsx")).await.unwrap(), "signals.a");
        let err = fs.read_text(Path::new("/p/b.jsx")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn disk_fs_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Card.tsx"), "signals.x").unwrap();

        let fs = DiskFs;
        assert!(fs.exists(&dir.path().join("Card.tsx")).await);
        assert!(!fs.exists(dir.path()).await);
        assert!(!fs.exists(&dir.path().join("Nope.tsx")).await);
    }
}
