//! Passphrase-derived secret cipher for secure-string config values.
//!
//! Implements [`SecretCipher`] with a PBKDF2-HMAC-SHA256 key and
//! ChaCha20-Poly1305 AEAD. Ciphertext is base64-armored so it can live
//! inside a JSON config document as an ordinary string. Every `encrypt`
//! call draws a fresh salt and nonce, so re-encrypting the same
//! plaintext yields different ciphertext; `decrypt` inverts any of them.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use maestro_common::{Error, Result};
use maestro_config::SecretCipher;
use pbkdf2::pbkdf2_hmac;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;

const MAGIC: &[u8; 8] = b"MSSEC001";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const KDF_ITERS: u32 = 100_000;
/// Maximum iterations accepted during decryption to prevent DoS via
/// crafted ciphertext.
const MAX_KDF_ITERS: u32 = 10_000_000;
const HEADER_LEN: usize = 8 + 4 + SALT_LEN + NONCE_LEN;

/// A [`SecretCipher`] keyed by a host-supplied passphrase.
#[derive(Clone)]
pub struct PassphraseCipher {
    passphrase: String,
}

impl PassphraseCipher {
    pub fn new(passphrase: impl Into<String>) -> Result<Self> {
        let passphrase = passphrase.into();
        if passphrase.is_empty() {
            return Err(Error::Secrecy("empty passphrase".to_string()));
        }
        Ok(Self { passphrase })
    }
}

impl std::fmt::Debug for PassphraseCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak the passphrase through Debug output.
        f.debug_struct("PassphraseCipher").finish_non_exhaustive()
    }
}

fn derive_key(passphrase: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut key);
    key
}

fn parse_header(bytes: &[u8]) -> Result<(u32, [u8; SALT_LEN], [u8; NONCE_LEN])> {
    if bytes.len() <= HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
        return Err(Error::Secrecy("invalid ciphertext header".to_string()));
    }

    let mut offset = MAGIC.len();
    let mut iter_bytes = [0u8; 4];
    iter_bytes.copy_from_slice(&bytes[offset..offset + 4]);
    let iterations = u32::from_be_bytes(iter_bytes);
    offset += 4;

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&bytes[offset..offset + SALT_LEN]);
    offset += SALT_LEN;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&bytes[offset..offset + NONCE_LEN]);

    if iterations == 0 || iterations > MAX_KDF_ITERS {
        return Err(Error::Secrecy("invalid ciphertext header".to_string()));
    }

    Ok((iterations, salt, nonce))
}

impl SecretCipher for PassphraseCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        let key = derive_key(&self.passphrase, &salt, KDF_ITERS);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| Error::Secrecy("encryption failed".to_string()))?;

        let mut output = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        output.extend_from_slice(MAGIC);
        output.extend_from_slice(&KDF_ITERS.to_be_bytes());
        output.extend_from_slice(&salt);
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(output))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let bytes = BASE64
            .decode(ciphertext)
            .map_err(|_| Error::Secrecy("ciphertext is not base64".to_string()))?;

        let (iterations, salt, nonce) = parse_header(&bytes)?;
        let payload = &bytes[HEADER_LEN..];

        let key = derive_key(&self.passphrase, &salt, iterations);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce), payload)
            .map_err(|_| Error::Secrecy("decryption failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| Error::Secrecy("decrypted payload is not UTF-8".to_string()))
    }
}
