use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Document is not well-formed, or cannot be written back out.
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Invalid location expression '{path}': {reason}")]
    Path { path: String, reason: String },

    #[error("Unexpected root element: expected {expected}, found {found}")]
    RootMismatch { expected: String, found: String },

    /// Stored text cannot be coerced to the field's declared type.
    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    /// MIME content is absent or could not be turned into CERP.
    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl Error {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Error::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
