//! Error taxonomy for the string encryption codec.

use thiserror::Error;

use crate::crypto::{CipherError, IV_HEX_LEN, IV_LEN, SALT_HEX_LEN, SALT_LEN};

/// Structural problems with an envelope string.
///
/// These are detected before any key derivation happens and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The envelope does not split into the expected number of `:` segments.
    #[error(
        "expected the envelope to be in the form \"pbkdf2_iterations:salt_hex:iv_hex:text_base64\", found {0} segment(s)"
    )]
    SegmentCount(usize),

    /// The salt segment does not hold exactly [`SALT_LEN`] bytes of hex.
    #[error("expected the salt to be {SALT_LEN} bytes ({SALT_HEX_LEN} hex chars), found {0} chars")]
    SaltLength(usize),

    /// The IV segment does not hold exactly [`IV_LEN`] bytes of hex.
    #[error("expected the IV to be {IV_LEN} bytes ({IV_HEX_LEN} hex chars), found {0} chars")]
    IvLength(usize),

    /// A salt or IV segment of the right length contains non-hex characters.
    #[error("salt or IV segment is not valid hex")]
    Hex,

    /// The ciphertext segment is not padded standard base64.
    #[error("ciphertext segment is not valid base64")]
    Base64,
}

/// Errors returned by [`encrypt`](crate::encrypt) and [`decrypt`](crate::decrypt).
#[derive(Debug, Error)]
pub enum CryptError {
    /// A required text argument was empty or whitespace only.
    #[error("{field} must not be empty or whitespace")]
    EmptyInput {
        /// Name of the offending argument.
        field: &'static str,
    },

    /// The PBKDF2 iteration count is not a positive integer.
    ///
    /// Raised both for the `iterations` argument of encryption and for the
    /// first segment of an envelope that is otherwise structurally plausible.
    #[error("the PBKDF2 iteration count must be a positive integer, was: {0}")]
    InvalidIterations(String),

    /// The envelope string is malformed.
    #[error("invalid envelope: {0}")]
    Format(#[from] FormatError),

    /// Decryption failed with both standard and zero padding.
    #[error("decryption failed: {0}")]
    Cipher(#[from] CipherError),
}

impl CryptError {
    /// Returns `true` for errors caused by the shape of the envelope text,
    /// including an unusable iteration count.
    pub fn is_format(&self) -> bool {
        matches!(self, CryptError::Format(_) | CryptError::InvalidIterations(_))
    }
}
