use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failures surfaced to the caller.
///
/// Programming errors (wrong vector lengths, backprop without a prior
/// feedforward pass, class index out of range) are not represented here;
/// they panic.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An image, weight file or JSON document is malformed.
    #[error("format error: {0}")]
    Format(String),

    /// The topology or engine configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Format(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Format(other.to_string()),
        }
    }
}
