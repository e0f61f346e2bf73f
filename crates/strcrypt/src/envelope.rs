//! The text envelope that carries everything needed to decrypt except the password.
//!
//! # Format
//!
//! ```text
//! current: <iterations>:<SALT_HEX>:<IV_HEX>:<base64(ciphertext)>
//! legacy:              <SALT_HEX>:<IV_HEX>:<base64(ciphertext)>
//! ```
//!
//! Hex is uppercase without separators (64 chars of salt, 32 chars of IV);
//! base64 is the standard alphabet with padding. Legacy envelopes predate the
//! iteration segment and always used [`DEFAULT_ITERATIONS`].

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::trace;

use crate::crypto::{DEFAULT_ITERATIONS, IV_HEX_LEN, IV_LEN, SALT_HEX_LEN, SALT_LEN};
use crate::error::{CryptError, FormatError};

/// Segment separator.
pub const SEPARATOR: char = ':';

const CURRENT_SEGMENTS: usize = 4;
const LEGACY_SEGMENTS: usize = 3;

/// Which generation of the format an envelope was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeFormat {
    /// Four segments, iteration count first.
    Current,
    /// Three segments, iteration count implied.
    Legacy,
}

/// A parsed, validated envelope.
///
/// Built by [`Envelope::new`] on encryption or by [`Envelope::parse`] on
/// decryption. Its `Display` output is always the current four-segment form,
/// so re-serialising a legacy envelope upgrades it without touching the
/// ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    iterations: NonZeroU32,
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
    format: EnvelopeFormat,
}

impl Envelope {
    /// Assemble a current-format envelope from its parts.
    pub fn new(
        iterations: NonZeroU32,
        salt: [u8; SALT_LEN],
        iv: [u8; IV_LEN],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            iterations,
            salt,
            iv,
            ciphertext,
            format: EnvelopeFormat::Current,
        }
    }

    /// Parse and validate an envelope string.
    ///
    /// A three-segment input is first read as a legacy envelope by prefixing
    /// the default iteration count. If that fails, parsing falls through to the
    /// strict four-segment rules, so the reported error describes the current
    /// format.
    ///
    /// # Errors
    ///
    /// Returns [`CryptError::InvalidIterations`] if the first segment is not a
    /// positive integer, and [`CryptError::Format`] for any other structural
    /// problem.
    pub fn parse(text: &str) -> Result<Self, CryptError> {
        if text.split(SEPARATOR).count() == LEGACY_SEGMENTS {
            let upgraded = format!("{DEFAULT_ITERATIONS}{SEPARATOR}{text}");
            match Self::parse_current(&upgraded) {
                Ok(envelope) => {
                    trace!("parsed legacy envelope without iteration count");
                    return Ok(Self {
                        format: EnvelopeFormat::Legacy,
                        ..envelope
                    });
                }
                Err(e) => trace!(error = %e, "three-segment input is not a legacy envelope"),
            }
        }
        Self::parse_current(text)
    }

    fn parse_current(text: &str) -> Result<Self, CryptError> {
        let segments: Vec<&str> = text.split(SEPARATOR).collect();
        if segments.len() != CURRENT_SEGMENTS {
            return Err(FormatError::SegmentCount(segments.len()).into());
        }
        let (iterations_raw, salt_raw, iv_raw, ciphertext_raw) =
            (segments[0], segments[1], segments[2], segments[3]);

        let iterations = iterations_raw
            .parse::<NonZeroU32>()
            .map_err(|_| CryptError::InvalidIterations(iterations_raw.to_owned()))?;
        if salt_raw.len() != SALT_HEX_LEN {
            return Err(FormatError::SaltLength(salt_raw.len()).into());
        }
        if iv_raw.len() != IV_HEX_LEN {
            return Err(FormatError::IvLength(iv_raw.len()).into());
        }
        let ciphertext = STANDARD
            .decode(ciphertext_raw)
            .map_err(|_| FormatError::Base64)?;

        let mut salt = [0u8; SALT_LEN];
        hex::decode_to_slice(salt_raw, &mut salt).map_err(|_| FormatError::Hex)?;
        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(iv_raw, &mut iv).map_err(|_| FormatError::Hex)?;

        Ok(Self::new(iterations, salt, iv, ciphertext))
    }

    /// PBKDF2 iteration count the key was derived with.
    pub fn iterations(&self) -> NonZeroU32 {
        self.iterations
    }

    /// The KDF salt.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The CBC initialization vector.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Raw ciphertext bytes.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// The format generation this envelope was parsed from.
    pub fn format(&self) -> EnvelopeFormat {
        self.format
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.iterations,
            hex::encode_upper(self.salt),
            hex::encode_upper(self.iv),
            STANDARD.encode(&self.ciphertext),
        )
    }
}

impl FromStr for Envelope {
    type Err = CryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
