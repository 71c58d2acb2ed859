use crate::b64;
use crate::credentials::Credentials;
use crate::crypto;
use crate::header;
use crate::normalize::normalized_ts;
use crate::util::unix_seconds;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// A timestamp MAC: the server's clock reading, signed with the client's credentials.
///
/// A server sends this in `WWW-Authenticate` when it rejects a request as stale, and the client
/// uses [`TimestampMac::offset`] to learn how far its own clock is off.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampMac {
    ts: u64,
    tsm: Vec<u8>,
    error: Option<String>,
}

impl TimestampMac {
    pub fn new(ts: SystemTime, credentials: &Credentials) -> TimestampMac {
        let ts = unix_seconds(ts);
        TimestampMac {
            ts,
            tsm: sign_ts(ts, credentials),
            error: None,
        }
    }

    /// Attach an error message, rendered as a trailing `error` attribute.
    pub fn with_error<S: Into<String>>(mut self, error: S) -> TimestampMac {
        self.error = Some(error.into());
        self
    }

    /// The signed timestamp, in seconds since the epoch.
    pub fn ts(&self) -> u64 {
        self.ts
    }

    pub fn tsm(&self) -> &[u8] {
        &self.tsm
    }

    /// Validate a timestamp MAC header received from a server and return the number of seconds
    /// to add to the local clock (`now`) to match the server's.
    ///
    /// This is advisory: a header that is missing either attribute, or whose MAC does not match,
    /// yields `None`.
    pub fn offset(header: &str, credentials: &Credentials, now: SystemTime) -> Option<i64> {
        let fields = header::parse(header);
        let ts = u64::from_str(fields.get("ts")?).ok()?;
        let tsm = fields.get("tsm")?;

        if !crypto::constant_time_compare_b64(&sign_ts(ts, credentials), tsm) {
            log::debug!("Ignoring timestamp with invalid tsm for {:?}", credentials.id);
            return None;
        }
        let ts = i64::try_from(ts).ok()?;
        let now = i64::try_from(unix_seconds(now)).ok()?;
        ts.checked_sub(now)
    }
}

fn sign_ts(ts: u64, credentials: &Credentials) -> Vec<u8> {
    credentials.key.sign(normalized_ts(ts).as_bytes())
}

impl fmt::Display for TimestampMac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hawk ts=\"{}\", tsm=\"{}\"", self.ts, b64::encode(&self.tsm))?;
        if let Some(ref error) = self.error {
            write!(f, ", error=\"{}\"", error)?;
        }
        Ok(())
    }
}
