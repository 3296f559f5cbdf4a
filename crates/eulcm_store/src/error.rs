use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    /// The backing store could not complete the request.
    #[error("Store request failed: {0}")]
    RequestFailed(String),

    #[error("Object {pid} does not declare content model {content_model}")]
    ModelMismatch { pid: String, content_model: String },

    #[error(transparent)]
    Content(#[from] eulcm_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
