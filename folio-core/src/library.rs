//! Library catalog: the list of books offered for selection

use crate::error::LoadError;
use crate::types::{BookKind, BookRef, BookSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A book offered in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub title: String,

    /// Path relative to the library root, or an absolute URL
    pub path: String,

    #[serde(alias = "type")]
    pub kind: BookKind,

    /// Optional cover image location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl LibraryEntry {
    pub fn new(title: impl Into<String>, path: impl Into<String>, kind: BookKind) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            kind,
            cover: None,
        }
    }

    /// Reference used to load this entry
    pub fn book_ref(&self) -> BookRef {
        BookRef::new(BookSource::from_location(&self.path), self.kind)
    }
}

/// Ordered collection of library entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    pub entries: Vec<LibraryEntry>,
}

impl Library {
    pub fn new(entries: Vec<LibraryEntry>) -> Self {
        Self { entries }
    }

    /// The built-in sample shelf
    pub fn sample() -> Self {
        Self::new(vec![
            LibraryEntry::new("Sample Book 1", "./books/book1.txt", BookKind::PlainText),
            LibraryEntry::new("Sample Book 2", "./books/book2.epub", BookKind::Epub),
            LibraryEntry::new("Sample Book 3", "./books/book3.txt", BookKind::PlainText),
        ])
    }

    /// Parse a JSON catalog (an array of entries)
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::Catalog(e.to_string()))
    }

    /// Load a JSON catalog from disk
    pub async fn load(path: &Path) -> Result<Self, LoadError> {
        let data = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
            _ => LoadError::Catalog(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_json(&data)
    }

    /// Build a catalog from the readable books in a directory
    /// Entries are sorted by file name; paths are relative to `dir`
    pub async fn scan(dir: &Path) -> Result<Self, LoadError> {
        let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(dir.display().to_string()),
            _ => LoadError::Fetch(format!("{}: {}", dir.display(), e)),
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?
        {
            let path = entry.path();
            let supported = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(BookKind::from_extension)
                .is_some();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if supported && is_file {
                files.push(path);
            }
        }
        files.sort();

        let entries = files
            .iter()
            .filter_map(|path| {
                let kind = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(BookKind::from_extension)?;
                let name = path.file_name()?.to_str()?;
                let title = path.file_stem()?.to_str()?;
                Some(LibraryEntry::new(title, name, kind))
            })
            .collect();

        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by exact title or path
    pub fn find(&self, key: &str) -> Option<&LibraryEntry> {
        self.entries
            .iter()
            .find(|e| e.title == key || e.path == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_library() {
        let library = Library::sample();
        assert_eq!(library.len(), 3);
        assert_eq!(library.entries[1].kind, BookKind::Epub);
        assert_eq!(
            library.find("Sample Book 3").unwrap().path,
            "./books/book3.txt"
        );
    }

    #[test]
    fn test_from_json_accepts_type_alias() {
        let json = r#"[
            {"title": "One", "path": "./books/book1.txt", "type": "txt"},
            {"title": "Two", "path": "https://example.org/two.epub", "kind": "epub", "cover": "two.png"}
        ]"#;
        let library = Library::from_json(json).unwrap();
        assert_eq!(library.entries[0].kind, BookKind::PlainText);
        assert_eq!(library.entries[1].cover.as_deref(), Some("two.png"));
        assert!(matches!(
            library.entries[1].book_ref().source,
            BookSource::Url(_)
        ));
    }

    #[test]
    fn test_from_json_rejects_unknown_kind() {
        let json = r#"[{"title": "X", "path": "x.pdf", "type": "pdf"}]"#;
        assert!(matches!(
            Library::from_json(json),
            Err(LoadError::Catalog(_))
        ));
    }

    #[tokio::test]
    async fn test_scan_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["b.txt", "a.epub", "notes.md", "c.TXT"] {
            tokio::fs::write(dir.path().join(name), b"x").await.unwrap();
        }
        tokio::fs::create_dir(dir.path().join("folder.txt")).await.unwrap();

        let library = Library::scan(dir.path()).await.unwrap();
        let paths: Vec<&str> = library.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a.epub", "b.txt", "c.TXT"]);
        assert_eq!(library.entries[0].title, "a");
        assert_eq!(library.entries[2].kind, BookKind::PlainText);
    }

    #[tokio::test]
    async fn test_load_missing_catalog() {
        let err = Library::load(Path::new("/nonexistent/library.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scan_errors_keep_their_cause() {
        let dir = tempfile::TempDir::new().unwrap();

        let err = Library::scan(&dir.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));

        // A file is not a directory, but it does exist
        let file = dir.path().join("book.txt");
        tokio::fs::write(&file, b"x").await.unwrap();
        let err = Library::scan(&file).await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch(_)), "{:?}", err);
    }
}
