use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] rekey_yaml::YamlError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("aborted at {file}: {source}")]
    Aborted {
        file: String,
        #[source]
        source: Box<BatchError>,
    },
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
