//! AES-256-CBC encryption and decryption of byte strings.
//!
//! **No authentication.** CBC with block padding carries no MAC: decrypting
//! with the wrong key usually fails the padding check, but sometimes yields
//! garbage bytes without any error. The only integrity signal is whatever the
//! padding scheme incidentally provides.

use aes::Aes256;
use cbc::cipher::{
    block_padding::{NoPadding, Pkcs7},
    BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use thiserror::Error;

use super::kdf::DerivedKey;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Byte length of a CBC initialization vector (one AES block).
pub const IV_LEN: usize = BLOCK_LEN;

/// How the final block is unpadded on decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// PKCS#7 padding, validated and stripped.
    Pkcs7,
    /// Zero padding. The decrypted blocks are returned whole: trailing zero
    /// bytes cannot be told apart from plaintext and are left in place.
    Zeros,
}

/// Errors produced by the cipher layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The ciphertext length is not a multiple of [`BLOCK_LEN`].
    #[error("ciphertext length {0} is not a multiple of the {BLOCK_LEN}-byte block size")]
    BlockLength(usize),

    /// The decrypted final block does not carry valid padding.
    #[error("padding is invalid and cannot be removed")]
    Padding,
}

/// Encrypt `plaintext` with AES-256-CBC and PKCS#7 padding.
///
/// The output is always a non-empty multiple of [`BLOCK_LEN`]; an empty
/// plaintext encrypts to one full block of padding.
pub fn encrypt(plaintext: &[u8], key: &DerivedKey, iv: &[u8; IV_LEN]) -> Vec<u8> {
    Aes256CbcEnc::new(key.as_bytes().into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt `ciphertext` with AES-256-CBC, removing padding according to `padding`.
///
/// The returned buffer holds exactly the bytes left after unpadding.
///
/// # Errors
///
/// Returns [`CipherError::BlockLength`] if `ciphertext` is not block aligned.
/// Returns [`CipherError::Padding`] if `padding` is [`Padding::Pkcs7`] and the
/// final block is not validly padded, which includes an empty ciphertext.
pub fn decrypt(
    ciphertext: &[u8],
    key: &DerivedKey,
    iv: &[u8; IV_LEN],
    padding: Padding,
) -> Result<Vec<u8>, CipherError> {
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::BlockLength(ciphertext.len()));
    }

    let decryptor = Aes256CbcDec::new(key.as_bytes().into(), iv.into());
    let mut buf = ciphertext.to_vec();
    let produced = match padding {
        Padding::Pkcs7 => decryptor.decrypt_padded_mut::<Pkcs7>(&mut buf),
        Padding::Zeros => decryptor.decrypt_padded_mut::<NoPadding>(&mut buf),
    }
    .map_err(|_| CipherError::Padding)?
    .len();

    buf.truncate(produced);
    Ok(buf)
}
