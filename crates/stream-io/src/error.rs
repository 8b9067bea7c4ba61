use thiserror::Error;

/// Errors surfaced by the buffered reader and writer.
///
/// Both clean EOF (represented as `Ok` with a zero-length result) and I/O
/// failure are distinguishable: EOF never produces an `Err`.
#[derive(Debug, Error)]
pub enum StreamIoError {
    #[error("stream io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot allocate buffer of {0} bytes")]
    Alloc(usize),
}

pub type StreamIoResult<T> = Result<T, StreamIoError>;
