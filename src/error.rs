use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// A boxed error coming from an external codec.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Everything that can go wrong while building an icon container.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be decoded as a PNG image.
    #[error("failed to decode PNG input: {0}")]
    Decode(#[source] BoxedError),

    /// A bitmap could not be encoded as a PNG image.
    #[error("failed to encode PNG image: {0}")]
    Encode(#[source] BoxedError),

    /// A bitmap has unusable dimensions or a mismatched data length.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Encoded data (PackBits or container bytes) is malformed.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The requested icon entry format cannot be produced by this encoder.
    #[error("unsupported icon encoding for '{0}'")]
    UnsupportedEncoding(String),

    /// A single icon entry failed; the container is abandoned.
    #[error("failed to build icon entry {label}: {source}")]
    Entry {
        /// The ICNS OSType or ICO size of the failed entry.
        label: String,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },

    /// An I/O error while writing container bytes.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Wraps this error with the label of the entry being built.
    pub fn in_entry<S: Into<String>>(self, label: S) -> Error {
        Error::Entry {
            label: label.into(),
            source: Box::new(self),
        }
    }
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
