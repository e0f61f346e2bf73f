//! Request and response types for the line-oriented JSON interface.
//!
//! Each request is one JSON object on its own line, tagged by `op`. Each
//! response is one JSON object on its own line, tagged by `result`.

use serde::{Deserialize, Serialize};
use strcrypt::{Envelope, EnvelopeFormat};

use crate::error::ToolError;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A single operation read from the input stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Encrypt `plaintext` under `password`.
    Encrypt {
        plaintext: String,
        password: String,
        /// PBKDF2 iteration count; the configured default when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iterations: Option<u32>,
    },
    /// Decrypt a current or legacy envelope.
    Decrypt { envelope: String, password: String },
    /// Report an envelope's parameters without decrypting it.
    Inspect { envelope: String },
}

impl Request {
    /// Operation name, safe to log.
    pub fn op(&self) -> &'static str {
        match self {
            Request::Encrypt { .. } => "encrypt",
            Request::Decrypt { .. } => "decrypt",
            Request::Inspect { .. } => "inspect",
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Envelope generation as reported by `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatName {
    Current,
    Legacy,
}

impl From<EnvelopeFormat> for FormatName {
    fn from(format: EnvelopeFormat) -> Self {
        match format {
            EnvelopeFormat::Current => FormatName::Current,
            EnvelopeFormat::Legacy => FormatName::Legacy,
        }
    }
}

/// Standard error body, returned for any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description. Never contains plaintext or passwords.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&ToolError> for ErrorResponse {
    fn from(e: &ToolError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Encrypted {
        envelope: String,
    },
    Decrypted {
        plaintext: String,
    },
    Inspected {
        format: FormatName,
        iterations: u32,
        ciphertext_len: usize,
    },
    Error(ErrorResponse),
}

impl Response {
    /// Summarise a parsed envelope for `inspect`.
    pub fn inspected(envelope: &Envelope) -> Self {
        Response::Inspected {
            format: envelope.format().into(),
            iterations: envelope.iterations().get(),
            ciphertext_len: envelope.ciphertext().len(),
        }
    }

    /// Returns `true` for [`Response::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

impl From<ToolError> for Response {
    fn from(e: ToolError) -> Self {
        Response::Error(ErrorResponse::from(&e))
    }
}
