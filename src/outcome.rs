use crate::credentials::Credentials;
use crate::tsm::TimestampMac;
use std::fmt;
use std::time::SystemTime;

/// The result of authenticating a header or bewit.
///
/// Rejections are ordinary values here; `Error` is reserved for misuse of the API.
#[derive(Debug, Clone)]
pub enum Authentication {
    /// The request is authentic, and was made by the holder of these credentials.
    Authenticated(Credentials),
    Failed(Failure),
}

impl Authentication {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Authentication::Authenticated(_))
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Authentication::Authenticated(credentials) => Some(credentials),
            Authentication::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Authentication::Authenticated(_) => None,
            Authentication::Failed(failure) => Some(failure),
        }
    }
}

impl From<Failure> for Authentication {
    fn from(failure: Failure) -> Self {
        Authentication::Failed(failure)
    }
}

/// The part of a request that caused authentication to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureField {
    Id,
    Ts,
    Nonce,
    Hash,
    Mac,
    Bewit,
}

impl FailureField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureField::Id => "id",
            FailureField::Ts => "ts",
            FailureField::Nonce => "nonce",
            FailureField::Hash => "hash",
            FailureField::Mac => "mac",
            FailureField::Bewit => "bewit",
        }
    }
}

impl fmt::Display for FailureField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected authentication: which field failed, and why.
///
/// A stale timestamp failure also carries the credentials that were resolved for the request,
/// so that the challenge can include a timestamp MAC the client can verify.
#[derive(Debug, Clone)]
pub struct Failure {
    field: FailureField,
    message: String,
    credentials: Option<Credentials>,
}

impl Failure {
    pub fn new<S: Into<String>>(field: FailureField, message: S) -> Failure {
        Failure {
            field,
            message: message.into(),
            credentials: None,
        }
    }

    pub(crate) fn with_credentials(mut self, credentials: Credentials) -> Failure {
        self.credentials = Some(credentials);
        self
    }

    pub fn field(&self) -> FailureField {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Render a `WWW-Authenticate` header value for this failure.
    ///
    /// When the failure carries credentials this is `Hawk ts="..", tsm="..", error=".."` with
    /// the server's time `now`; otherwise it is `Hawk error=".."`.
    pub fn challenge(&self, now: SystemTime) -> String {
        match self.credentials {
            Some(ref credentials) => TimestampMac::new(now, credentials)
                .with_error(self.message.as_str())
                .to_string(),
            None => format!("Hawk error=\"{}\"", self.message),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
