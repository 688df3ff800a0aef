use core::result::Result as CoreResult;
use lopdf::Document;
use sage_core::{Dataset, DocumentSource, Error, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Reads every PDF, text and markdown file under a folder, one text per file.
///
/// Files are visited in sorted path order. Files that yield no text (scanned
/// PDFs, empty notes) or that cannot be parsed as PDF are skipped with a
/// warning; I/O errors still fail the whole load.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFolder;

/// Document kinds the loader understands.
enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentFolder {
    fn kind_of(path: &Path) -> Option<DocumentKind> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "md" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// Extracts the text of every page of a PDF.
    ///
    /// # Errors
    /// Returns [`Error::Document`] if the file is not a readable PDF
    pub fn extract_pdf_text(path: &Path) -> Result<String> {
        let document = Document::load(path)
            .map_err(|err| Error::Document(format!("{}: {err}", path.display())))?;
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        document
            .extract_text(&pages)
            .map_err(|err| Error::Document(format!("{}: {err}", path.display())))
    }

    fn extract(path: &Path, kind: &DocumentKind) -> Result<String> {
        match kind {
            DocumentKind::Pdf => Self::extract_pdf_text(path),
            DocumentKind::PlainText => Ok(String::from_utf8_lossy(&fs::read(path)?).into_owned()),
        }
    }
}

impl DocumentSource for DocumentFolder {
    fn load_documents(&self, folder: &Path) -> Result<Dataset> {
        if !folder.is_dir() {
            return Err(Error::NotFound(format!(
                "Document folder {} does not exist",
                folder.display()
            )));
        }

        let mut texts = Vec::new();
        for entry in WalkDir::new(folder)
            .sort_by_file_name()
            .into_iter()
            .filter_map(CoreResult::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(kind) = Self::kind_of(entry.path()) else {
                continue;
            };

            let text = match Self::extract(entry.path(), &kind) {
                Ok(text) => text,
                Err(Error::Document(reason)) => {
                    tracing::warn!(%reason, "Skipping unreadable document");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if text.trim().is_empty() {
                tracing::warn!(path = %entry.path().display(), "Skipping document with no text");
                continue;
            }
            texts.push(text);
        }

        tracing::info!(
            documents = texts.len(),
            folder = %folder.display(),
            "Loaded document folder"
        );

        Ok(Dataset::documents(texts, folder.display().to_string()))
    }
}
