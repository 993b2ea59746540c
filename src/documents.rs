// Contract input: plain-text files and readers
use log::info;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Pdf,
    Word,
    Text,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),
    #[error("Text extraction from {kind:?} documents is not available; convert {} to plain text first", .path.display())]
    ExtractionUnavailable { kind: DocumentType, path: PathBuf },
    #[error("No content found in contract")]
    Empty,
    #[error("Failed to read contract: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentType {
    /// Classify by file extension, case-insensitively
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentType::Pdf),
            Some("docx") | Some("doc") => Ok(DocumentType::Word),
            Some("txt") | Some("md") => Ok(DocumentType::Text),
            _ => Err(DocumentError::Unsupported(path.to_path_buf())),
        }
    }
}

/// Read contract text from a file.
pub fn read_contract(path: impl AsRef<Path>) -> Result<String, DocumentError> {
    let path = path.as_ref();
    match DocumentType::from_path(path)? {
        DocumentType::Text => {}
        kind => {
            return Err(DocumentError::ExtractionUnavailable {
                kind,
                path: path.to_path_buf(),
            })
        }
    }

    let text = std::fs::read_to_string(path)?;
    let text = non_empty(text)?;
    info!("Read contract {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

/// Read contract text from any reader, e.g. stdin.
pub fn read_contract_from<R: Read>(mut reader: R) -> Result<String, DocumentError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    non_empty(text)
}

fn non_empty(text: String) -> Result<String, DocumentError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DocumentError::Empty);
    }
    Ok(trimmed.to_string())
}
