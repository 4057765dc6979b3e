//! Reading and writing the passwords file.
//!
//! The file is always read and written whole.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::Document;
use crate::errors::{Error, Result};

/// Read and parse the document at `path`.
pub fn load_document(path: &Path) -> Result<Document> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

    let document = Document::parse(&contents, &path.display().to_string())?;
    debug!(path = %path.display(), entries = document.root().len(), "Loaded passwords document");
    Ok(document)
}

/// Serialize `document` and replace the file at `path` with it.
pub fn save_document(path: &Path, document: &Document) -> Result<()> {
    fs::write(path, document.to_yaml())
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;

    info!(path = %path.display(), "Wrote passwords document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("passwords.yml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("passwords.yml"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passwords.yml");
        let document = Document::from_yaml_str("a: one\nb:\n  c: two\n").unwrap();

        save_document(&path, &document).unwrap();
        assert_eq!(load_document(&path).unwrap(), document);
    }

    #[test]
    fn test_save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("passwords.yml");
        let err = save_document(&path, &Document::default()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
