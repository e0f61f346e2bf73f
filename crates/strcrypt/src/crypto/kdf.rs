//! PBKDF2 key derivation.
//!
//! Keys are derived with PBKDF2 using HMAC-SHA1 as the pseudorandom function.
//! SHA-1 is weak as a plain hash but remains sound inside HMAC, and it is the
//! PRF every stored envelope was produced with, so it cannot change without
//! breaking existing ciphertexts.

use std::fmt;
use std::num::NonZeroU32;

use sha1::Sha1;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the per-encryption salt.
pub const SALT_LEN: usize = 32;

/// PBKDF2 iteration count used when the caller does not pick one, and the
/// count implied by legacy envelopes.
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// A derived AES-256 key.
///
/// Lives only for the duration of one cipher operation. The buffer is
/// overwritten with zeroes when dropped.
pub struct DerivedKey(Box<[u8; KEY_LEN]>);

impl DerivedKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive a 32-byte key from `password`, `salt` and `iterations`.
///
/// Deterministic: identical inputs always yield the same key.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN], iterations: NonZeroU32) -> DerivedKey {
    let mut key = Box::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha1>(password, salt, iterations.get(), key.as_mut_slice());
    DerivedKey(key)
}
