use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Off2TxtError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("File does not exist: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Broken symlink: {}", path.display())]
    BrokenSymlink { path: PathBuf },

    #[error("File is not readable: {}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory is not readable: {}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown extension: {extension}")]
    UnknownExtension { path: PathBuf, extension: String },

    #[error("Invalid Office container {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    #[error("Malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("Failed to read spreadsheet {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },

    #[error("Exception writing output file: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Exception making directory: {}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Interrupted")]
    Cancelled,
}

impl Off2TxtError {
    /// File-access problems are reported (unless suppressed) but never
    /// change the run's exit status.
    pub fn is_file_access(&self) -> bool {
        matches!(
            self,
            Off2TxtError::FileNotFound { .. }
                | Off2TxtError::BrokenSymlink { .. }
                | Off2TxtError::FileUnreadable { .. }
                | Off2TxtError::DirectoryUnreadable { .. }
        )
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        Off2TxtError::Archive {
            path: path.into(),
            message: error.to_string(),
        }
    }

    pub(crate) fn xml(part: &str, error: impl std::fmt::Display) -> Self {
        Off2TxtError::Xml {
            part: part.to_string(),
            message: error.to_string(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Off2TxtError {
    fn user_message(&self) -> String {
        match self {
            Off2TxtError::Write { path, source } => {
                format!("Exception writing output file: {} ({})", path.display(), source)
            }
            Off2TxtError::CreateDirectory { path, source } => {
                format!("Exception making directory: {} ({})", path.display(), source)
            }
            Off2TxtError::Archive { path, message } => {
                format!("Could not open {}: {}", path.display(), message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Off2TxtError::UnknownExtension { .. } => Some(
                "Only .docx, .pptx and .xlsx files are supported.".to_string()
            ),
            Off2TxtError::Archive { .. } => Some(
                "Legacy binary formats (.doc, .ppt, .xls) are not supported. Re-save the file in Office Open XML format.".to_string()
            ),
            Off2TxtError::Config { .. } => Some(
                "Check your configuration file syntax and the values given on the command line.".to_string()
            ),
            Off2TxtError::Write { .. } | Off2TxtError::CreateDirectory { .. } => Some(
                "Ensure you have write permission for the output location.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Off2TxtError {
    fn from(error: toml::de::Error) -> Self {
        Off2TxtError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Off2TxtError>;
