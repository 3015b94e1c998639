//! Error types for vecdraw

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrawError {
    /// Rejected before anything was handed to the rasterizer.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The backend primitive failed. Lines drawn before the failure stay drawn.
    #[error("Backend failure: {0}")]
    BackendFailure(String),

    #[error("Cannot allocate surface of {width}x{height}")]
    ResourceExhausted { width: u32, height: u32 },
}

impl DrawError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DrawError::InvalidParameter(msg.into())
    }

    pub(crate) fn backend(msg: impl Into<String>) -> Self {
        DrawError::BackendFailure(msg.into())
    }
}
