//! AES-256-CBC primitives and PBKDF2 key derivation.
//!
//! Neither module knows about the text envelope; they operate on raw bytes
//! only and hold no state between calls.

pub mod cipher;
pub mod kdf;

pub use cipher::{CipherError, Padding, BLOCK_LEN, IV_LEN};
pub use kdf::{derive_key, DerivedKey, DEFAULT_ITERATIONS, KEY_LEN, SALT_LEN};

/// Length of the salt segment in an envelope (two hex chars per byte).
pub const SALT_HEX_LEN: usize = SALT_LEN * 2;

/// Length of the IV segment in an envelope (two hex chars per byte).
pub const IV_HEX_LEN: usize = IV_LEN * 2;
