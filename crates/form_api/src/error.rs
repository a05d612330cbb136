use shared::error::{ErrorCode, ErrorReport, ValidationErrors};
use storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("no record matches {identity}")]
    NotFound { identity: String },
    #[error("could not save records: {0}")]
    Storage(#[from] StorageError),
}

impl FormError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FormError::Validation(_) => ErrorCode::Validation,
            FormError::NotFound { .. } => ErrorCode::NotFound,
            FormError::Storage(_) => ErrorCode::Storage,
        }
    }

    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            FormError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<&FormError> for ErrorReport {
    fn from(value: &FormError) -> Self {
        match value {
            FormError::Validation(errors) => ErrorReport::from(errors.clone()),
            other => ErrorReport::new(other.code(), other.to_string()),
        }
    }
}
