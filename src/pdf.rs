use std::path::{Path, PathBuf};

use lopdf::Document;
use thiserror::Error;

/// Artifact lopdf emits for glyphs it cannot map back to text.
const IDENTITY_H_ARTIFACT: &str = "?Identity-H Unimplemented?";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to read PDF container {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("document {path} has no pages")]
    Empty { path: PathBuf },

    #[error("failed to extract text from page {page}: {message}")]
    Extraction { page: u32, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// A loaded PDF container with per-page text access and page-range export.
pub struct SourceDocument {
    doc: Document,
}

impl SourceDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = Document::load(path).map_err(|e| PdfError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if doc.get_pages().is_empty() {
            return Err(PdfError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { doc })
    }

    /// 1-based page numbers in document order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    pub fn page_text(&self, page: u32) -> Result<String> {
        let text = self
            .doc
            .extract_text(&[page])
            .map_err(|e| PdfError::Extraction {
                page,
                message: e.to_string(),
            })?;

        Ok(text.replace(IDENTITY_H_ARTIFACT, ""))
    }

    /// Writes pages `first..=last` (1-based, inclusive) as a standalone PDF.
    pub fn write_page_range(&self, first: u32, last: u32, output: &Path) -> Result<()> {
        let mut subset = self.doc.clone();

        let delete: Vec<u32> = subset
            .get_pages()
            .keys()
            .copied()
            .filter(|page| *page < first || *page > last)
            .collect();

        if !delete.is_empty() {
            subset.delete_pages(&delete);
        }
        subset.prune_objects();

        subset.save(output).map_err(|e| PdfError::Write {
            path: output.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(())
    }
}
