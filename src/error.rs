use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure while turning a spreadsheet (or artifact) into a [`ColumnTable`].
///
/// [`ColumnTable`]: crate::data::model::ColumnTable
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed data in {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("unsupported file type: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl LoadError {
    pub(crate) fn access(path: &Path, source: io::Error) -> Self {
        LoadError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, message: impl std::fmt::Display) -> Self {
        LoadError::Format {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Failure while deriving the dashboard view from a loaded table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("no records with a partner, a CPT code and Medicare or Medicaid data")]
    NoPayerData,
}
