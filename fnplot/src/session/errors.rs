use std::path::PathBuf;

use expr_eval::{EvalError, ParseError};
use thiserror::Error;

use super::{DatasetID, DomainID};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid definitions file {}: {reason}", path.display())]
    FileFormat { path: PathBuf, reason: String },

    #[error("could not parse '{expression}': {source}")]
    Parse {
        expression: String,
        #[source]
        source: ParseError,
    },

    #[error("invalid function '{function}': {reason}")]
    Validation { function: String, reason: String },

    #[error("invalid domain: {0}")]
    Range(String),

    #[error("{field} must be a number, got '{text}'")]
    InvalidNumber { field: &'static str, text: String },

    #[error("evaluating '{function}' at x = {x}, y = {y} failed: {source}")]
    Evaluation {
        function: String,
        x: f64,
        y: f64,
        #[source]
        source: EvalError,
    },

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("unknown domain {0}")]
    UnknownDomain(DomainID),

    #[error("unknown dataset {0}")]
    UnknownDataset(DatasetID),

    #[error("no function selected")]
    NoFunctionSelected,

    #[error("no domain selected")]
    NoDomainSelected,
}

impl AppError {
    pub(crate) fn validation(function: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            function: function.to_owned(),
            reason: reason.into(),
        }
    }
}
