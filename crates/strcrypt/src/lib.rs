//! Password-based string encryption.
//!
//! A plaintext string and a password become a self-describing text envelope:
//!
//! ```text
//! <pbkdf2_iterations>:<SALT_HEX>:<IV_HEX>:<base64(ciphertext)>
//! ```
//!
//! The key is derived with PBKDF2 (HMAC-SHA1) from the password and a fresh
//! 32-byte salt; the plaintext is encrypted with AES-256-CBC under a fresh
//! 16-byte IV. Older three-segment envelopes without the iteration count are
//! still accepted on decryption.
//!
//! ```no_run
//! let envelope = strcrypt::encrypt("Hello World!", "P4$$w0|2|)", 1000)?;
//! assert_eq!(strcrypt::decrypt(&envelope, "P4$$w0|2|)")?, "Hello World!");
//! # Ok::<(), strcrypt::CryptError>(())
//! ```
//!
//! All functions are stateless and may be called from any number of threads.

pub mod codec;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod random;

pub use codec::{decrypt, encrypt, encrypt_default, encrypt_with};
pub use crypto::DEFAULT_ITERATIONS;
pub use envelope::{Envelope, EnvelopeFormat};
pub use error::{CryptError, FormatError};
pub use random::{OsRandom, RandomSource};
