use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A byte stream could not be represented in the requested ECI, or the ECI itself is
    /// unassigned or otherwise not a character encoding.
    #[error("invalid data for the requested character encoding")]
    InvalidData,

    /// The output file could not be opened or written.
    #[error("could not open or write output file")]
    FileAccess(#[from] std::io::Error),

    /// A color string was not a well-formed 6 or 8 hex-digit RGB(A) value.
    #[error("invalid colour string: {0:?}")]
    InvalidColour(String),
}

pub type Result<T> = std::result::Result<T, Error>;
