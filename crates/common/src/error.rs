//! Front-end error type.

use strcrypt::CryptError;
use thiserror::Error;

/// Top-level error reported back to a caller for a single request.
///
/// Variants map to the machine-readable codes in
/// [`ErrorResponse`](crate::protocol::ErrorResponse):
/// - [`ToolError::BadRequest`] → `bad_request`
/// - [`ToolError::DecryptionFailure`] → `decryption_failure`
/// - [`ToolError::Internal`] → `internal`
#[derive(Debug, Error)]
pub enum ToolError {
    /// The request was malformed: invalid JSON, blank or malformed envelope,
    /// or a bad iteration count.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The envelope was well formed but could not be decrypted.
    #[error("decryption failure: {0}")]
    DecryptionFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Returns the short code sent to callers for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::BadRequest(_) => "bad_request",
            ToolError::DecryptionFailure(_) => "decryption_failure",
            ToolError::Internal(_) => "internal",
        }
    }
}

impl From<CryptError> for ToolError {
    fn from(e: CryptError) -> Self {
        match e {
            CryptError::Cipher(_) => ToolError::DecryptionFailure(e.to_string()),
            CryptError::EmptyInput { .. }
            | CryptError::InvalidIterations(_)
            | CryptError::Format(_) => ToolError::BadRequest(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::BadRequest(format!("invalid request JSON: {e}"))
    }
}
