pub(crate) mod ooxml;
pub mod presentation;
pub mod spreadsheet;
pub mod word;

pub use presentation::PresentationReader;
pub use spreadsheet::SpreadsheetReader;
pub use word::WordReader;

use crate::error::{Off2TxtError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The Office document families understood by off2txt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Word,
    Presentation,
    Spreadsheet,
}

impl DocumentKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "docx" => Some(DocumentKind::Word),
            "pptx" => Some(DocumentKind::Presentation),
            "xlsx" => Some(DocumentKind::Spreadsheet),
            _ => None,
        }
    }

    /// Resolve the kind of `path`, or report its extension as unknown.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        Self::from_extension(extension).ok_or_else(|| Off2TxtError::UnknownExtension {
            path: path.to_path_buf(),
            extension: if extension.is_empty() {
                String::new()
            } else {
                format!(".{}", extension)
            },
        })
    }

    /// Output extension used when none is configured.
    pub fn default_output_extension(&self) -> &'static str {
        match self {
            DocumentKind::Spreadsheet => "csv",
            DocumentKind::Word | DocumentKind::Presentation => "txt",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DocumentKind::Word => "Word",
            DocumentKind::Presentation => "PowerPoint",
            DocumentKind::Spreadsheet => "Excel",
        };
        f.write_str(name)
    }
}

/// Text recovered from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Paragraphs, in document order.
    Lines(Vec<String>),
    /// Worksheet rows, in workbook order.
    Rows(Vec<Vec<String>>),
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        match self {
            Extraction::Lines(lines) => lines.is_empty(),
            Extraction::Rows(rows) => rows.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Extraction::Lines(lines) => lines.len(),
            Extraction::Rows(rows) => rows.len(),
        }
    }
}

/// Open `path` and extract it with the reader for `kind`.
pub fn extract(path: &Path, kind: DocumentKind) -> Result<Extraction> {
    log::debug!("extracting {} as {}", path.display(), kind);

    let file = BufReader::new(File::open(path)?);
    let extraction = match kind {
        DocumentKind::Word => Extraction::Lines(WordReader::new().read(file, path)?),
        DocumentKind::Presentation => {
            Extraction::Lines(PresentationReader::new().read(file, path)?)
        }
        DocumentKind::Spreadsheet => {
            Extraction::Rows(SpreadsheetReader::new().read(file, path)?)
        }
    };

    log::debug!("{}: {} text runs", path.display(), extraction.len());
    Ok(extraction)
}
