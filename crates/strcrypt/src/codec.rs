//! Encrypt and decrypt strings under a password.
//!
//! # Decryption fallback
//!
//! Decryption first removes PKCS#7 padding. If the cipher layer rejects the
//! result, the same key, IV and ciphertext are decrypted exactly once more
//! with zero padding, and whatever that second attempt returns is final.
//! Envelopes written by older releases depend on this fallback. Format and
//! validation errors are never retried.

use std::num::NonZeroU32;

use tracing::debug;

use crate::crypto::{cipher, derive_key, CipherError, Padding, DEFAULT_ITERATIONS, IV_LEN, SALT_LEN};
use crate::envelope::Envelope;
use crate::error::CryptError;
use crate::random::{OsRandom, RandomSource};

/// Padding modes tried in order by [`decrypt`].
const DECRYPT_ATTEMPTS: [Padding; 2] = [Padding::Pkcs7, Padding::Zeros];

/// Encrypt `plaintext` under `password` with [`DEFAULT_ITERATIONS`].
///
/// # Errors
///
/// See [`encrypt`].
pub fn encrypt_default(plaintext: &str, password: &str) -> Result<String, CryptError> {
    encrypt(plaintext, password, DEFAULT_ITERATIONS)
}

/// Encrypt `plaintext` under `password`, returning a current-format envelope.
///
/// A fresh salt and IV are drawn from the OS CSPRNG on every call, so
/// encrypting the same input twice never yields the same envelope. Empty
/// plaintexts and empty passwords are allowed.
///
/// # Errors
///
/// Returns [`CryptError::InvalidIterations`] if `iterations` is zero.
pub fn encrypt(plaintext: &str, password: &str, iterations: u32) -> Result<String, CryptError> {
    encrypt_with(plaintext, password, iterations, &OsRandom)
}

/// Like [`encrypt`], drawing the salt and then the IV from `rng`.
///
/// # Errors
///
/// Returns [`CryptError::InvalidIterations`] if `iterations` is zero.
pub fn encrypt_with(
    plaintext: &str,
    password: &str,
    iterations: u32,
    rng: &dyn RandomSource,
) -> Result<String, CryptError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| CryptError::InvalidIterations(iterations.to_string()))?;

    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt);
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv);

    let key = derive_key(password.as_bytes(), &salt, iterations);
    let ciphertext = cipher::encrypt(plaintext.as_bytes(), &key, &iv);

    Ok(Envelope::new(iterations, salt, iv, ciphertext).to_string())
}

/// Decrypt an envelope produced by [`encrypt`] or by a legacy release.
///
/// CBC carries no authentication: a wrong password usually surfaces as
/// [`CryptError::Cipher`], but may also decrypt to garbage text. Bytes that
/// are not valid UTF-8 are replaced with U+FFFD.
///
/// # Errors
///
/// Returns [`CryptError::EmptyInput`] if `envelope` is empty or whitespace,
/// [`CryptError::Format`] or [`CryptError::InvalidIterations`] if it cannot be
/// parsed, and [`CryptError::Cipher`] if both decryption attempts fail.
pub fn decrypt(envelope: &str, password: &str) -> Result<String, CryptError> {
    if envelope.trim().is_empty() {
        return Err(CryptError::EmptyInput { field: "envelope" });
    }
    let envelope = Envelope::parse(envelope)?;
    let key = derive_key(password.as_bytes(), envelope.salt(), envelope.iterations());

    let mut last_error: Option<CipherError> = None;
    for padding in DECRYPT_ATTEMPTS {
        match cipher::decrypt(envelope.ciphertext(), &key, envelope.iv(), padding) {
            Ok(plaintext) => return Ok(String::from_utf8_lossy(&plaintext).into_owned()),
            Err(e) => {
                debug!(?padding, error = %e, "decryption attempt failed");
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or(CipherError::Padding).into())
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use super::*;
    use crate::random::MockRandomSource;

    const LEGACY: &str = "98499D68A1DBB303EBD77F814CC178E95DAA323BD71DC3D942627A149DEB9A51:189BB9A021F5040C9B8572C7C2933248:etyJjoHnziStmEVedWM0iQ==";
    const PASSWORD: &str = "P4$$w0|2|)";

    fn fixed_rng(salt: [u8; SALT_LEN], iv: [u8; IV_LEN]) -> MockRandomSource {
        let mut rng = MockRandomSource::new();
        let mut seq = Sequence::new();
        rng.expect_fill()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |dest| dest.copy_from_slice(&salt));
        rng.expect_fill()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |dest| dest.copy_from_slice(&iv));
        rng
    }

    fn never_plaintext(result: Result<String, CryptError>, plaintext: &str) {
        if let Ok(decrypted) = result {
            assert_ne!(decrypted, plaintext);
        }
    }

    #[test]
    fn decrypts_known_legacy_envelope() {
        assert_eq!(decrypt(LEGACY, PASSWORD).unwrap(), "Hello World!");
    }

    #[test]
    fn decrypts_known_current_envelope() {
        assert_eq!(decrypt(&format!("1000:{LEGACY}"), PASSWORD).unwrap(), "Hello World!");
    }

    #[test]
    fn fixed_salt_and_iv_reproduce_known_envelope() {
        let mut salt = [0u8; SALT_LEN];
        hex::decode_to_slice(&LEGACY[..64], &mut salt).unwrap();
        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(&LEGACY[65..97], &mut iv).unwrap();

        let rng = fixed_rng(salt, iv);
        let envelope = encrypt_with("Hello World!", PASSWORD, 1000, &rng).unwrap();
        assert_eq!(envelope, format!("1000:{LEGACY}"));
    }

    #[test]
    fn round_trip_regular_characters() {
        let password = "1234ffddddddddf5666";
        let text = "Hello World!";
        let first = encrypt_default(text, password).unwrap();
        let second = encrypt_default(text, password).unwrap();
        assert_eq!(decrypt(&first, password).unwrap(), text);
        assert_eq!(decrypt(&second, password).unwrap(), text);
        assert_ne!(first, text);
        assert_ne!(first, second);
    }

    #[test]
    fn round_trip_high_unicode() {
        let password = "1234ffdddddddd\u{26A1}f5666";
        let text = "Hello\u{26A1}\u{26A1}\u{26A1}\u{26A1}\u{26A1} World!";
        let envelope = encrypt_default(text, password).unwrap();
        assert_eq!(decrypt(&envelope, password).unwrap(), text);
    }

    #[test]
    fn round_trip_empty_password_and_empty_text() {
        let envelope = encrypt_default("Hello World!", "").unwrap();
        assert_eq!(decrypt(&envelope, "").unwrap(), "Hello World!");

        let envelope = encrypt_default("", "1234ffddddddddf5666").unwrap();
        assert!(!envelope.trim().is_empty());
        assert_eq!(decrypt(&envelope, "1234ffddddddddf5666").unwrap(), "");

        let envelope = encrypt_default("", "").unwrap();
        assert_eq!(decrypt(&envelope, "").unwrap(), "");
    }

    #[test]
    fn round_trip_large_payload() {
        let text = "0123456789abcdef".repeat(64 * 1024);
        let envelope = encrypt(&text, "pw", 10).unwrap();
        assert_eq!(decrypt(&envelope, "pw").unwrap(), text);
    }

    #[test]
    fn custom_iterations_are_recorded_and_used() {
        let envelope = encrypt("Hello world!", "Password", 39).unwrap();
        assert!(envelope.starts_with("39:"));
        assert_eq!(decrypt(&envelope, "Password").unwrap(), "Hello world!");

        assert!(encrypt_default("Hello world!", "Password")
            .unwrap()
            .starts_with("1000:"));
    }

    #[test]
    fn custom_iterations_still_randomise() {
        let first = encrypt("Hello World!", PASSWORD, 50).unwrap();
        let second = encrypt("Hello World!", PASSWORD, 50).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn zero_iterations_rejected_before_any_randomness() {
        let rng = MockRandomSource::new();
        let result = encrypt_with("Hello World!", "Password", 0, &rng);
        assert!(matches!(result, Err(CryptError::InvalidIterations(raw)) if raw == "0"));
    }

    #[test]
    fn wrong_password_never_yields_plaintext() {
        let envelope = encrypt_default("Hello World!", "some pass").unwrap();
        for i in 0..50 {
            never_plaintext(decrypt(&envelope, &format!("wrong-{i}")), "Hello World!");
        }
    }

    #[test]
    fn password_prefix_is_not_enough() {
        let long = "fahjdsfadsf987hdsafbd6fbasd90fvb6ads0fvb6das98fbsad0fvbads09fvb\u{df}9vbf6absdf6";
        let envelope = encrypt_default("Hello World!", long).unwrap();
        never_plaintext(decrypt(&envelope, &long[..long.len() - 1]), "Hello World!");
    }

    #[test]
    fn tampered_ciphertext_never_yields_plaintext() {
        let envelope = encrypt_default("Hello World!", PASSWORD).unwrap();
        let start = envelope.rfind(':').unwrap() + 1;
        for offset in 0..4 {
            let mut tampered = envelope.clone().into_bytes();
            let c = &mut tampered[start + offset];
            *c = if *c == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(tampered).unwrap();
            never_plaintext(decrypt(&tampered, PASSWORD), "Hello World!");
        }
    }

    #[test]
    fn blank_envelope_rejected() {
        for blank in ["", "   ", "\t\n"] {
            assert!(matches!(
                decrypt(blank, "pw"),
                Err(CryptError::EmptyInput { field: "envelope" })
            ));
        }
    }

    #[test]
    fn format_errors_are_not_retried_as_cipher_errors() {
        let err = decrypt("1000:ABC:DEF:GHI", PASSWORD).unwrap_err();
        assert!(err.is_format());
        let err = decrypt(&format!("-200:{LEGACY}"), PASSWORD).unwrap_err();
        assert!(matches!(err, CryptError::InvalidIterations(_)));
    }

    #[test]
    fn unaligned_ciphertext_fails_after_fallback() {
        // 15 bytes of ciphertext: neither padding mode can decrypt it.
        let envelope = format!("1000:{}:{}:AAAAAAAAAAAAAAAAAAAA", &LEGACY[..64], &LEGACY[65..97]);
        assert!(matches!(
            decrypt(&envelope, PASSWORD),
            Err(CryptError::Cipher(CipherError::BlockLength(15)))
        ));
    }

    #[test]
    fn bad_padding_falls_back_to_zero_padding() {
        // Encrypt with one password and decrypt with another until the PKCS#7
        // attempt fails; the fallback then returns the whole raw block.
        let envelope = encrypt("Hello World!", "right", 1).unwrap();
        let parsed = Envelope::parse(&envelope).unwrap();
        let fell_back = (0..64).map(|i| format!("wrong-{i}")).find(|password| {
            let key = derive_key(password.as_bytes(), parsed.salt(), parsed.iterations());
            cipher::decrypt(parsed.ciphertext(), &key, parsed.iv(), Padding::Pkcs7).is_err()
        });
        let password = fell_back.expect("some wrong password fails PKCS#7 unpadding");
        let decrypted = decrypt(&envelope, &password).unwrap();
        assert_ne!(decrypted, "Hello World!");
        assert!(!decrypted.is_empty());
    }
}
