use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiffEngineError {
    #[error("base and new streams have different lengths")]
    UnequalStreamLength,

    #[error(transparent)]
    Paged(#[from] paged::PagedError),
}

pub type DiffEngineResult<T> = Result<T, DiffEngineError>;
