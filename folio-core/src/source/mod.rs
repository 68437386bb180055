//! Content sources: where the raw bytes of a book come from

mod http;

pub use http::HttpSource;

use crate::error::LoadError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Result type for source operations
pub type SourceResult<T> = std::result::Result<T, LoadError>;

/// Abstract byte source for books
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Read the whole book stored at `location`
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Local filesystem source
pub struct LocalSource {
    root: Option<PathBuf>,
}

impl LocalSource {
    /// Create a source confined to the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Create a source that reads any path as given
    pub fn unrestricted() -> Self {
        Self { root: None }
    }

    /// Safely resolve a path, preventing path traversal attacks
    fn full_path(&self, location: &str) -> SourceResult<PathBuf> {
        let Some(root) = &self.root else {
            return Ok(PathBuf::from(location));
        };

        // Normalize path components, rejecting any that escape the root
        let mut normalized = PathBuf::new();
        for component in Path::new(location).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(LoadError::PathTraversal(location.to_string()));
                }
            }
        }

        Ok(root.join(normalized))
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>> {
        let full_path = self.full_path(location)?;
        tokio::fs::read(&full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(full_path.display().to_string()),
            _ => LoadError::Fetch(format!("{}: {}", full_path.display(), e)),
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// In-memory source (for testing and pre-fetched libraries)
#[derive(Default)]
pub struct MemorySource {
    books: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book under the given location
    pub fn with_book(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.books.insert(location.into(), bytes.into());
        self
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>> {
        self.books
            .get(location)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(location.to_string()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemorySource::new().with_book("a.txt", b"hello".to_vec());

        assert_eq!(source.read("a.txt").await.unwrap(), b"hello");
        assert!(matches!(
            source.read("missing.txt").await,
            Err(LoadError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_source_reads_under_root() {
        let dir = tempfile::TempDir::new().unwrap();
        tokio::fs::create_dir_all(dir.path().join("books")).await.unwrap();
        tokio::fs::write(dir.path().join("books/book1.txt"), b"line")
            .await
            .unwrap();

        let source = LocalSource::new(dir.path());
        assert_eq!(source.read("./books/book1.txt").await.unwrap(), b"line");
        assert!(matches!(
            source.read("books/none.txt").await,
            Err(LoadError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_source_rejects_traversal() {
        let source = LocalSource::new("/srv/books");
        assert!(matches!(
            source.read("../etc/passwd").await,
            Err(LoadError::PathTraversal(_))
        ));
        assert!(matches!(
            source.read("/etc/passwd").await,
            Err(LoadError::PathTraversal(_))
        ));
    }
}
