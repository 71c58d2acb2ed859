use crate::crypto;
use crate::error::Result;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Number of random bytes in a generated nonce.
const NONCE_BYTES: usize = 8;

/// Create a random nonce with `NONCE_BYTES` bytes of entropy, hex-encoded.
pub(crate) fn random_nonce() -> Result<String> {
    let mut bytes = [0u8; NONCE_BYTES];
    crypto::rand_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// Whole seconds since the epoch; times before the epoch count as zero.
pub(crate) fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// The time `secs` seconds after the epoch, or None if that is not representable.
pub(crate) fn from_unix_seconds(secs: u64) -> Option<SystemTime> {
    UNIX_EPOCH.checked_add(Duration::from_secs(secs))
}
