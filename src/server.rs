use crate::b64;
use crate::bewit::{split_bewit, Bewit};
use crate::clock::{Clock, SystemClock};
use crate::credentials::{Credentials, CredentialsLookup, NonceLookup};
use crate::crypto;
use crate::header;
use crate::mac::{Mac, MacType};
use crate::normalize::Artifacts;
use crate::outcome::{Authentication, Failure, FailureField};
use crate::request::Request;
use crate::util::unix_seconds;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use url::{Position, Url};

/// How far a request's timestamp may be from the server's clock, in either direction, unless
/// configured otherwise.
pub const DEFAULT_TIMESTAMP_SKEW: Duration = Duration::from_secs(60);

/// The server side of Hawk: authenticates `Authorization` headers and bewits.
///
/// A `Server` holds only references to its collaborators and its configuration, so it is cheap
/// to build per request.
///
/// # Examples
///
/// ```
/// use hawk_auth::{Credentials, DigestAlgorithm, RequestBuilder, Server};
/// use std::time::Duration;
///
/// let lookup = |id: &str| Credentials::new(id, "secret", DigestAlgorithm::Sha256).ok();
/// let seen = |_nonce: &str| false;
/// let server = Server::new(&lookup)
///     .nonce_lookup(&seen)
///     .timestamp_skew(Duration::from_secs(30));
///
/// let request = RequestBuilder::new("GET", "example.com", 443, "/").request().unwrap();
/// let credentials = lookup("me").unwrap();
/// let header = request.make_header(&credentials).unwrap();
/// assert!(server.authenticate(&header.to_string(), &request).is_authenticated());
/// ```
pub struct Server<'a> {
    credentials: &'a dyn CredentialsLookup,
    nonces: Option<&'a dyn NonceLookup>,
    timestamp_skew: Duration,
    clock: &'a dyn Clock,
}

impl<'a> Server<'a> {
    /// Create a server that resolves client ids with `credentials`, does not check nonces for
    /// replay, allows `DEFAULT_TIMESTAMP_SKEW`, and reads the system clock.
    pub fn new(credentials: &'a dyn CredentialsLookup) -> Self {
        Server {
            credentials,
            nonces: None,
            timestamp_skew: DEFAULT_TIMESTAMP_SKEW,
            clock: &SystemClock,
        }
    }

    /// Reject requests whose nonce `nonces` reports as already seen.
    pub fn nonce_lookup(mut self, nonces: &'a dyn NonceLookup) -> Self {
        self.nonces = Some(nonces);
        self
    }

    /// Set the allowed difference between a request's timestamp and the server's clock.  Only
    /// whole seconds are significant.
    pub fn timestamp_skew(mut self, skew: Duration) -> Self {
        self.timestamp_skew = skew;
        self
    }

    /// Use `clock` rather than the system clock.
    pub fn clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Authenticate a request's `Authorization` header.
    ///
    /// The checks run in order, and the first to fail determines the result: the client id
    /// must resolve to credentials, the timestamp must be within the allowed skew, the nonce
    /// must be present and unused, the MAC must match, and a payload hash in the header must
    /// match the request's payload.
    ///
    /// If the request carries neither a payload nor a hash, the header's `hash` value is still
    /// covered by the MAC, but is not checked against anything.
    pub fn authenticate(&self, header: &str, request: &Request) -> Authentication {
        let fields = header::parse(header);
        match self.check_header(&fields, request) {
            Ok(credentials) => Authentication::Authenticated(credentials),
            Err(failure) => {
                log::debug!(
                    "Hawk authentication failed for id {:?}: {}",
                    fields.get("id"),
                    failure
                );
                failure.into()
            }
        }
    }

    /// Authenticate a request by bewit.  `bewit` is the value of the `bewit` query parameter;
    /// the request's path may still contain that parameter, since it is removed before the MAC
    /// is checked.
    pub fn authenticate_bewit(&self, bewit: &str, request: &Request) -> Authentication {
        match self.check_bewit(bewit, request) {
            Ok(credentials) => Authentication::Authenticated(credentials),
            Err(failure) => {
                log::debug!("Hawk bewit authentication failed: {}", failure);
                failure.into()
            }
        }
    }

    fn check_header(
        &self,
        fields: &HashMap<String, String>,
        request: &Request,
    ) -> Result<Credentials, Failure> {
        let credentials = field(fields, "id")
            .and_then(|id| self.credentials.lookup(id))
            .ok_or_else(|| Failure::new(FailureField::Id, "Unidentified id"))?;

        let ts = match field(fields, "ts").and_then(|ts| u64::from_str(ts).ok()) {
            Some(ts) if !self.is_stale(ts) => ts,
            _ => return Err(Failure::new(FailureField::Ts, "Stale ts").with_credentials(credentials)),
        };

        let nonce = field(fields, "nonce")
            .ok_or_else(|| Failure::new(FailureField::Nonce, "Missing nonce"))?;
        if self.nonces.map_or(false, |nonces| nonces.seen(nonce)) {
            return Err(Failure::new(FailureField::Nonce, "Invalid nonce"));
        }

        let local_hash = request.payload_hash(&credentials);
        check_mac(
            &credentials,
            request.artifacts(MacType::Header, ts, nonce, None),
            local_hash.as_deref(),
            fields,
        )?;
        Ok(credentials)
    }

    fn check_bewit(&self, token: &str, request: &Request) -> Result<Credentials, Failure> {
        let bewit =
            Bewit::from_str(token).map_err(|e| Failure::new(FailureField::Id, e.to_string()))?;

        let credentials = self
            .credentials
            .lookup(bewit.id())
            .ok_or_else(|| Failure::new(FailureField::Id, "Unidentified id"))?;

        if unix_seconds(bewit.exp()) < unix_seconds(self.clock.now()) {
            return Err(Failure::new(FailureField::Ts, "Stale timestamp"));
        }

        let (resource, _) = split_bewit(request.path())
            .map_err(|e| Failure::new(FailureField::Id, e.to_string()))?;

        if bewit_mac(&credentials, request, &bewit, &resource) == *bewit.mac() {
            return Ok(credentials);
        }

        // a client may have been handed an absolute URL as the resource
        if let Some(relative) = relative_resource(&resource) {
            if bewit_mac(&credentials, request, &bewit, &relative) == *bewit.mac() {
                return Ok(credentials);
            }
        }

        Err(Failure::new(FailureField::Bewit, "Invalid signature"))
    }

    fn is_stale(&self, ts: u64) -> bool {
        let now = unix_seconds(self.clock.now());
        now.abs_diff(ts) > self.timestamp_skew.as_secs()
    }
}

fn field<'f>(fields: &'f HashMap<String, String>, name: &str) -> Option<&'f str> {
    fields.get(name).map(String::as_str)
}

/// Check the `mac` of a parsed header against the MAC computed from `artifacts` with the
/// header's `ext`, `app` and `dlg`, then check any `hash` in the header against `local_hash`.
///
/// The MAC covers `local_hash` when there is one, and the header's own `hash` otherwise.
pub(crate) fn check_mac(
    credentials: &Credentials,
    artifacts: Artifacts<'_>,
    local_hash: Option<&[u8]>,
    fields: &HashMap<String, String>,
) -> Result<(), Failure> {
    let mac = field(fields, "mac").ok_or_else(|| Failure::new(FailureField::Mac, "Invalid mac"))?;

    let encoded_hash = local_hash.map(b64::encode);
    let expected = Mac::new(
        &credentials.key,
        &Artifacts {
            hash: encoded_hash.as_deref().or_else(|| field(fields, "hash")),
            ext: field(fields, "ext"),
            app: field(fields, "app"),
            dlg: field(fields, "dlg"),
            ..artifacts
        },
    );
    if !expected.matches_encoded(mac) {
        return Err(Failure::new(FailureField::Mac, "Invalid mac"));
    }

    if let (Some(local_hash), Some(hash)) = (local_hash, field(fields, "hash")) {
        if !crypto::constant_time_compare_b64(local_hash, hash) {
            return Err(Failure::new(FailureField::Hash, "Invalid hash"));
        }
    }
    Ok(())
}

fn bewit_mac(credentials: &Credentials, request: &Request, bewit: &Bewit, resource: &str) -> Mac {
    Mac::new(
        &credentials.key,
        &Artifacts {
            ext: bewit.ext(),
            app: None,
            dlg: None,
            path: resource,
            ..request.artifacts(MacType::Bewit, unix_seconds(bewit.exp()), "", None)
        },
    )
}

/// The path and query of an absolute URL, or None if `resource` is not one.
fn relative_resource(resource: &str) -> Option<String> {
    let url = Url::parse(resource).ok()?;
    if !url.has_host() {
        return None;
    }
    Some(url[Position::BeforePath..Position::AfterQuery].to_string())
}
