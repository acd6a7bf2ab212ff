use actix_session::SessionInsertError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session write error: {0}")]
    Write(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<SessionInsertError> for StoreError {
    fn from(err: SessionInsertError) -> Self {
        StoreError::Write(err.to_string())
    }
}
