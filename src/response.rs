use crate::b64;
use crate::credentials::Credentials;
use crate::error::*;
use crate::header::{self, Header};
use crate::mac::{Mac, MacType};
use crate::normalize::Artifacts;
use crate::outcome::Authentication;
use crate::payload::PayloadHasher;
use crate::request::RequestState;
use crate::server::check_mac;
use crate::util::unix_seconds;

/// A Response represents a response from an HTTP server.
///
/// The structure is created from a request and then used to either create (server) or validate
/// (client) a `Server-Authorization` header.  Both sides use the timestamp and nonce of the
/// request, so a response MAC cannot be replayed against a different request.
///
/// Like `Request`, Responses are built with `ResponseBuilders`.
#[derive(Debug, Clone)]
pub struct Response<'a> {
    method: &'a str,
    host: &'a str,
    port: u16,
    path: &'a str,
    reqstate: &'a RequestState,
    payload: Option<&'a [u8]>,
    content_type: Option<&'a str>,
    hash: Option<Vec<u8>>,
    ext: Option<&'a str>,
}

impl<'a> Response<'a> {
    /// Create a new Header for this response.
    ///
    /// The `Server-Authorization` header includes only mac, hash, and ext; render it with
    /// `serialize(Some(&HeaderField::RESPONSE))` or `to_string`, which are equivalent here.
    pub fn make_header(&self, credentials: &Credentials) -> Result<Header> {
        let hash = self.payload_hash(credentials);
        let encoded_hash = hash.as_ref().map(b64::encode);
        let mac = Mac::new(
            &credentials.key,
            &Artifacts {
                hash: encoded_hash.as_deref(),
                ..self.artifacts()
            },
        );

        Header::new(
            None,
            None,
            None,
            Some(mac),
            self.ext.map(str::to_string),
            hash,
            None,
            None,
        )
    }

    /// Authenticate a `Server-Authorization` header with the credentials used for the request.
    ///
    /// This checks that the MAC matches and, if this response has a payload or hash of its own
    /// and the header carries a hash, that the two hashes match.  There are no timestamp or
    /// nonce checks: those values were generated locally.
    pub fn authenticate(&self, header: &str, credentials: &Credentials) -> Authentication {
        let fields = header::parse(header);
        let local_hash = self.payload_hash(credentials);
        match check_mac(credentials, self.artifacts(), local_hash.as_deref(), &fields) {
            Ok(()) => Authentication::Authenticated(credentials.clone()),
            Err(failure) => {
                log::debug!(
                    "Hawk response authentication failed for id {:?}: {}",
                    credentials.id,
                    failure
                );
                failure.into()
            }
        }
    }

    fn payload_hash(&self, credentials: &Credentials) -> Option<Vec<u8>> {
        if let Some(ref hash) = self.hash {
            return Some(hash.clone());
        }
        self.payload.map(|payload| {
            PayloadHasher::hash(
                self.content_type.unwrap_or(""),
                credentials.algorithm(),
                payload,
            )
        })
    }

    fn artifacts(&self) -> Artifacts<'_> {
        Artifacts {
            mac_type: MacType::Response,
            ts: unix_seconds(self.reqstate.ts),
            nonce: &self.reqstate.nonce,
            method: self.method,
            path: self.path,
            host: self.host,
            port: self.port,
            hash: None,
            ext: self.ext,
            app: None,
            dlg: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseBuilder<'a>(Response<'a>);

impl<'a> ResponseBuilder<'a> {
    /// Generate a new Response from a request header.
    ///
    /// This is more commonly accessed through `Request::make_response_builder`.
    pub fn from_request_state(
        reqstate: &'a RequestState,
        method: &'a str,
        host: &'a str,
        port: u16,
        path: &'a str,
    ) -> Self {
        ResponseBuilder(Response {
            method,
            host,
            port,
            path,
            reqstate,
            payload: None,
            content_type: None,
            hash: None,
            ext: None,
        })
    }

    /// Set the response payload; it is hashed with the credentials' algorithm.
    pub fn payload<P: Into<Option<&'a [u8]>>>(mut self, payload: P) -> Self {
        self.0.payload = payload.into();
        self
    }

    /// Set the content type of the response payload.
    pub fn content_type<S: Into<Option<&'a str>>>(mut self, content_type: S) -> Self {
        self.0.content_type = content_type.into();
        self
    }

    /// Set the content hash for the response.
    ///
    /// This should always be calculated from the response payload, not copied from a header.
    pub fn hash<H: Into<Option<Vec<u8>>>>(mut self, hash: H) -> Self {
        self.0.hash = hash.into();
        self
    }

    /// Set the `ext` Hawk property for the response.
    ///
    /// This need only be set on the server; it is ignored in validating responses on the client.
    pub fn ext<S: Into<Option<&'a str>>>(mut self, ext: S) -> Self {
        self.0.ext = ext.into();
        self
    }

    /// Get the response from this builder
    pub fn response(self) -> Response<'a> {
        self.0
    }
}
