//! Source of salts and IVs.

use rand::{rngs::OsRng, RngCore};

/// Fills buffers with random bytes for salts and IVs.
///
/// Production code uses [`OsRandom`]. Implementations must be safe to share
/// between threads; the codec adds no locking of its own.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Overwrite all of `dest` with random bytes.
    fn fill(&self, dest: &mut [u8]);
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}
