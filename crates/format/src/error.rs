use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("bad file signature")]
    BadSignature,

    #[error("unsupported file version")]
    BadVersion,

    #[error("record truncated before expected length")]
    TruncatedRecord,

    #[error(transparent)]
    StreamIo(#[from] stream_io::StreamIoError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type FormatResult<T> = Result<T, FormatError>;
