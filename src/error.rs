use std::fmt::Display;
use std::io;

use thiserror::Error;

/// Errors that can occur while flattening a value into URL query values.
#[derive(Debug, Error)]
pub enum Error {
    /// The root value is absent, a bare scalar, or a shape that cannot
    /// carry query parameters (functions, channels and the like).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A shared value was reached again while it was still being
    /// flattened.
    #[error("cyclic value: a shared value refers back to itself")]
    CyclicValue,

    /// Raised by a `Serialize` implementation while converting a value.
    #[error("{0}")]
    Custom(String),

    /// Failure while writing encoded output.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn invalid<T: Display>(what: T) -> Self {
        Error::InvalidValue(what.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
