use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuyoutError>;

/// Failure taxonomy for the commitment workflow.
///
/// `NotFound`, `InvalidTransition` and `ValidationError` are the typed
/// failures surfaced at the engine boundary. The remaining variants carry
/// infrastructure errors (CSV interchange, IO, storage backends).
#[derive(Error, Debug)]
pub enum BuyoutError {
    #[error("commitment {entry_id} not found in project {project_code}")]
    NotFound {
        project_code: String,
        entry_id: String,
    },
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl BuyoutError {
    pub fn not_found(project_code: impl Into<String>, entry_id: impl Into<String>) -> Self {
        Self::NotFound {
            project_code: project_code.into(),
            entry_id: entry_id.into(),
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for BuyoutError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Internal(Box::new(e))
    }
}
