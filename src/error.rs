//! Error types for spark-folio.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("failed to open {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;

impl FolioError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }
}
