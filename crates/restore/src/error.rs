use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("record truncated before its declared size was fully read")]
    TruncatedRecord,

    #[error("v1 diff file failed validation: {0}")]
    InvalidLegacyDiff(String),

    #[error(transparent)]
    Format(#[from] format::FormatError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type RestoreResult<T> = Result<T, RestoreError>;
