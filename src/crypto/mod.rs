//! Digest primitives used by Hawk: keyed MACs, unkeyed hashes and constant-time comparison.
//!
//! Only two digest families exist in the protocol, so they are a closed enum mapped onto the
//! `ring` implementations in [`ring`](self::ring).

use crate::b64;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

mod ring;

/// The digest algorithm shared by a client and server for a set of credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// The name used for this algorithm in credential stores (`sha1` or `sha256`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;
    fn from_str(s: &str) -> Result<DigestAlgorithm> {
        match s {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

pub(crate) use self::ring::HmacKey;

/// Compute the HMAC of `message` under `key`.
pub fn hmac(algorithm: DigestAlgorithm, key: &[u8], message: &[u8]) -> Vec<u8> {
    HmacKey::new(algorithm, key).sign(message)
}

/// Compute the unkeyed digest of `message`.
pub fn hash(algorithm: DigestAlgorithm, message: &[u8]) -> Vec<u8> {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(message);
    hasher.finish()
}

/// An incremental digest, for content that arrives in pieces.
pub struct Hasher(self::ring::RingHasher);

impl Hasher {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Hasher(self::ring::RingHasher::new(algorithm))
    }

    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data)
    }

    pub fn finish(self) -> Vec<u8> {
        self.0.finish()
    }
}

/// Compare two byte strings in time independent of the position of any difference.
///
/// Inputs of unequal length never match.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    self::ring::constant_time_compare(a, b)
}

/// Compare a raw digest with a base64-encoded one. An undecodable value does not match.
pub fn constant_time_compare_b64(raw: &[u8], encoded: &str) -> bool {
    match b64::decode(encoded) {
        Ok(decoded) => constant_time_compare(raw, &decoded),
        Err(_) => false,
    }
}

/// Fill `output` from the operating system's secure random source.
pub fn rand_bytes(output: &mut [u8]) -> Result<()> {
    use rand::RngCore;
    rand::rngs::OsRng.try_fill_bytes(output)?;
    Ok(())
}
