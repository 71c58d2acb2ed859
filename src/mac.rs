use crate::b64;
use crate::credentials::Key;
use crate::crypto;
use crate::normalize::Artifacts;
use std::fmt;
use std::ops::Deref;

pub use crate::normalize::MacType;

/// Mac represents a message authentication code, the signature in a Hawk transaction.
///
/// Macs are computed over the normalized string of a header, response or bewit, and compared
/// in constant time.
#[derive(Clone)]
pub struct Mac(Vec<u8>);

impl Mac {
    /// Compute the MAC of the normalized string for `artifacts`.
    pub fn new(key: &Key, artifacts: &Artifacts) -> Mac {
        let normalized = artifacts.normalized();
        log::trace!("normalized {} string: {:?}", artifacts.mac_type.as_str(), normalized);
        Mac(key.sign(normalized.as_bytes()))
    }

    /// Compare against a base64-encoded MAC, as found in a header.  An undecodable value does
    /// not match.
    pub fn matches_encoded(&self, encoded: &str) -> bool {
        crypto::constant_time_compare_b64(&self.0, encoded)
    }

    /// The base64 encoding of this MAC, as used in headers and bewits.
    pub fn to_base64(&self) -> String {
        b64::encode(&self.0)
    }
}

impl AsRef<[u8]> for Mac {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl From<Vec<u8>> for Mac {
    fn from(original: Vec<u8>) -> Self {
        Mac(original)
    }
}

impl Deref for Mac {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl PartialEq for Mac {
    fn eq(&self, other: &Mac) -> bool {
        crypto::constant_time_compare(&self.0, &other.0)
    }
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mac({})", self.to_base64())
    }
}
