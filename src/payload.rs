use crate::crypto::{DigestAlgorithm, Hasher};
use crate::normalize::payload_prefix;

/// A utility for hashing payloads. Feed your entity body to this, then pass the `finish`
/// result to a request or response.
pub struct PayloadHasher {
    hasher: Hasher,
}

impl PayloadHasher {
    /// Create a new PayloadHasher. Any parameters in `content_type` (`; charset=..`) are
    /// dropped, as is surrounding whitespace. The digest should be the same as the digest used
    /// for the credentials in the request.
    pub fn new(content_type: &str, algorithm: DigestAlgorithm) -> Self {
        let mut hasher = Hasher::new(algorithm);
        hasher.update(payload_prefix(content_type).as_bytes());
        PayloadHasher { hasher }
    }

    /// Hash a single value and return it
    pub fn hash<B>(content_type: &str, algorithm: DigestAlgorithm, payload: B) -> Vec<u8>
    where
        B: AsRef<[u8]>,
    {
        let mut hasher = PayloadHasher::new(content_type, algorithm);
        hasher.update(payload);
        hasher.finish()
    }

    /// Update the hash with new data.
    pub fn update<B: AsRef<[u8]>>(&mut self, data: B) {
        self.hasher.update(data.as_ref());
    }

    /// Finish hashing and return the result
    pub fn finish(mut self) -> Vec<u8> {
        self.hasher.update(b"\n");
        self.hasher.finish()
    }
}
