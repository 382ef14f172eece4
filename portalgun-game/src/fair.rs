//! Commit-reveal fair random draws.
//!
//! Morty commits to a secret value before Rick answers: only the keyed digest
//! is disclosed up front. Once the round is over the secret and the key are
//! revealed, so anyone can recompute the digest and check that the value was
//! not swapped after Rick's contribution was known.
use std::fmt;

use hmac::{Hmac, Mac};
use rand::{CryptoRng, Rng, RngCore};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Size of the per-commitment key material in bytes (256 bits).
pub const KEY_BYTES: usize = 32;

/// Size of a commitment digest in bytes (HMAC-SHA-256 output).
pub const DIGEST_BYTES: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum FairRandomError {
    #[error("draw range must be positive (got {range})")]
    InvalidRange { range: u32 },
    #[error("expected {expected} bytes of hex, got {actual}")]
    HexLength { expected: usize, actual: usize },
    #[error("malformed hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Fresh high-entropy key material, never reused across commitments.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyMaterial([u8; KEY_BYTES]);

impl KeyMaterial {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_BYTES];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }

    /// Lowercase hex encoding used on the wire and in the console.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse key material previously produced by [`KeyMaterial::to_hex`].
    ///
    /// # Errors
    ///
    /// Returns an error when the input is not exactly 32 bytes of hex.
    pub fn from_hex(text: &str) -> Result<Self, FairRandomError> {
        decode_fixed(text).map(Self)
    }
}

// Key material is secret until reveal; keep it out of debug logs.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}

/// Binding digest disclosed before the counterpart answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_BYTES]);

impl Digest {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DIGEST_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_BYTES] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// # Errors
    ///
    /// Returns an error when the input is not exactly 32 bytes of hex.
    pub fn from_hex(text: &str) -> Result<Self, FairRandomError> {
        decode_fixed(text).map(Self)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn decode_fixed<const N: usize>(text: &str) -> Result<[u8; N], FairRandomError> {
    let bytes = hex::decode(text.trim())?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| FairRandomError::HexLength {
        expected: N,
        actual,
    })
}

/// A pledge to `secret`, bound by `digest = HMAC(key, secret)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    secret: u32,
    key: KeyMaterial,
    digest: Digest,
}

impl Commitment {
    /// Reassemble a commitment from disclosed parts, e.g. to audit a transcript.
    #[must_use]
    pub const fn from_parts(secret: u32, key: KeyMaterial, digest: Digest) -> Self {
        Self {
            secret,
            key,
            digest,
        }
    }

    /// Value withheld from the counterpart until reveal.
    #[must_use]
    pub const fn secret(&self) -> u32 {
        self.secret
    }

    #[must_use]
    pub const fn key(&self) -> &KeyMaterial {
        &self.key
    }

    /// The only part that may be shown before reveal.
    #[must_use]
    pub const fn digest(&self) -> Digest {
        self.digest
    }

    /// Recompute the digest from the stored pair and compare.
    #[must_use]
    pub fn verify(&self) -> bool {
        verify(self.secret, &self.key, &self.digest)
    }
}

/// Draw a secret uniformly from `[0, range)` and commit to it under fresh key material.
///
/// # Errors
///
/// Returns [`FairRandomError::InvalidRange`] when `range` is zero.
pub fn create_commitment<R: RngCore + CryptoRng>(
    range: u32,
    rng: &mut R,
) -> Result<Commitment, FairRandomError> {
    if range == 0 {
        return Err(FairRandomError::InvalidRange { range });
    }
    let secret = rng.gen_range(0..range);
    let key = KeyMaterial::generate(rng);
    let digest = keyed_digest(&key, secret);
    Ok(Commitment {
        secret,
        key,
        digest,
    })
}

/// HMAC-SHA-256 of the decimal representation of `secret`, keyed by `key`.
#[must_use]
pub fn keyed_digest(key: &KeyMaterial, secret: u32) -> Digest {
    let mut mac = new_mac(key);
    mac.update(secret.to_string().as_bytes());
    Digest(mac.finalize().into_bytes().into())
}

/// True only when `expected` is exactly the digest of `(key, secret)`.
#[must_use]
pub fn verify(secret: u32, key: &KeyMaterial, expected: &Digest) -> bool {
    let mut mac = new_mac(key);
    mac.update(secret.to_string().as_bytes());
    mac.verify_slice(expected.as_bytes()).is_ok()
}

fn new_mac(key: &KeyMaterial) -> HmacSha256 {
    // HMAC takes keys of any length, so this cannot fail.
    <HmacSha256 as Mac>::new_from_slice(key.as_bytes()).expect("HMAC accepts 32-byte keys")
}

/// Mix both parties' contributions: `(secret + counterpart) mod modulus`.
///
/// Uniform over `[0, modulus)` whenever `secret` is, whatever the counterpart answers.
///
/// # Errors
///
/// Returns [`FairRandomError::InvalidRange`] when `modulus` is zero.
pub fn combine(secret: u32, counterpart: u32, modulus: u32) -> Result<u32, FairRandomError> {
    if modulus == 0 {
        return Err(FairRandomError::InvalidRange { range: modulus });
    }
    let sum = (u64::from(secret) + u64::from(counterpart)) % u64::from(modulus);
    Ok(u32::try_from(sum).unwrap_or_default())
}
