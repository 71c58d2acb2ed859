use crate::b64;
use crate::bewit::Bewit;
use crate::credentials::Credentials;
use crate::error::*;
use crate::header::Header;
use crate::mac::{Mac, MacType};
use crate::normalize::Artifacts;
use crate::payload::PayloadHasher;
use crate::response::ResponseBuilder;
use crate::util::{random_nonce, unix_seconds};
use std::time::{Duration, SystemTime};
use url::{Position, Url};

/// Request represents a single HTTP request.
///
/// The structure is created using [`RequestBuilder`]. Most uses of this
/// library will hold several of the fields in this structure fixed.  Cloning the structure with
/// these fields applied is a convenient way to avoid repeating those fields. Most fields are
/// references, since in common use the values already exist and will outlive the request.
///
/// A request can be used on the client, to generate a header or a bewit, or on the server, to
/// authenticate a header or a bewit against it.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    method: &'a str,
    host: &'a str,
    port: u16,
    path: &'a str,
    payload: Option<&'a [u8]>,
    content_type: Option<&'a str>,
    hash: Option<Vec<u8>>,
    ext: Option<&'a str>,
    app: Option<&'a str>,
    dlg: Option<&'a str>,
}

impl<'a> Request<'a> {
    /// Create a new Header for this request, inventing a new nonce and setting the
    /// timestamp to the current time.
    pub fn make_header(&self, credentials: &Credentials) -> Result<Header> {
        let state = RequestState::new()?;
        self.make_header_full(credentials, state.ts, state.nonce)
    }

    /// Similar to `make_header`, but allowing specification of the timestamp
    /// and nonce.
    pub fn make_header_full<S>(
        &self,
        credentials: &Credentials,
        ts: SystemTime,
        nonce: S,
    ) -> Result<Header>
    where
        S: Into<String>,
    {
        let nonce = nonce.into();
        let hash = self.payload_hash(credentials);
        let encoded_hash = hash.as_ref().map(b64::encode);
        let mac = Mac::new(
            &credentials.key,
            &self.artifacts(
                MacType::Header,
                unix_seconds(ts),
                &nonce,
                encoded_hash.as_deref(),
            ),
        );
        Header::new(
            Some(credentials.id.clone()),
            Some(ts),
            Some(nonce),
            Some(mac),
            self.ext.map(str::to_string),
            hash,
            self.app.map(str::to_string),
            // dlg is only covered by the MAC alongside app
            self.app.and(self.dlg).map(str::to_string),
        )
    }

    /// Make a "bewit" that can be attached to a URL to authenticate GET access.
    ///
    /// The bewit is valid until `exp`.  Its MAC covers this request's method, path, host, port
    /// and `ext`; the path must not yet contain the bewit itself.
    pub fn make_bewit(&self, credentials: &Credentials, exp: SystemTime) -> Result<Bewit> {
        if credentials.id.contains('\\') {
            return Err(Error::InvalidComponent("id"));
        }
        if self.ext.map_or(false, |ext| ext.contains('\\')) {
            return Err(Error::InvalidComponent("ext"));
        }
        let mac = Mac::new(
            &credentials.key,
            &self.artifacts(MacType::Bewit, unix_seconds(exp), "", None),
        );
        Ok(Bewit::new(
            credentials.id.clone(),
            exp,
            mac,
            self.ext.map(str::to_string),
        ))
    }

    /// Variant of `make_bewit` that takes a time-to-live rather than an expiration time.
    pub fn make_bewit_with_ttl(&self, credentials: &Credentials, ttl: Duration) -> Result<Bewit> {
        self.make_bewit(credentials, SystemTime::now() + ttl)
    }

    /// Get a Response instance for a response to this request.  This is a convenience
    /// wrapper around `ResponseBuilder::from_request_state`.
    pub fn make_response_builder<'b>(&'b self, reqstate: &'b RequestState) -> ResponseBuilder<'b> {
        ResponseBuilder::from_request_state(reqstate, self.method, self.host, self.port, self.path)
    }

    pub fn method(&self) -> &str {
        self.method
    }

    pub fn host(&self) -> &str {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The request target: path and query, exactly as sent.
    pub fn path(&self) -> &str {
        self.path
    }

    /// The payload hash for this request under the given credentials: the explicitly supplied
    /// hash if there is one, else the hash of the payload if there is one.
    pub(crate) fn payload_hash(&self, credentials: &Credentials) -> Option<Vec<u8>> {
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

    /// The MAC inputs for this request.  `ext`, `app` and `dlg` are this request's own; a
    /// validator substitutes the values found in the header.
    pub(crate) fn artifacts<'b>(
        &'b self,
        mac_type: MacType,
        ts: u64,
        nonce: &'b str,
        hash: Option<&'b str>,
    ) -> Artifacts<'b> {
        Artifacts {
            mac_type,
            ts,
            nonce,
            method: self.method,
            path: self.path,
            host: self.host,
            port: self.port,
            hash,
            ext: self.ext,
            app: self.app,
            dlg: self.dlg,
        }
    }
}

/// A RequestBuilder is used to build a `Request`.
///
/// Method, host, port and path are required; `request` fails with `Error::MissingOption` if any
/// of them was never set.
///
/// # Examples
///
/// ```
/// use hawk_auth::RequestBuilder;
/// let base = RequestBuilder::default().method("GET").host("mysite.com").port(443);
/// let request1 = base.clone().method("POST").path("/api/user").request().unwrap();
/// let request2 = base.path("/api/users").request().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder<'a> {
    method: Option<&'a str>,
    host: Option<&'a str>,
    port: Option<u16>,
    path: Option<&'a str>,
    payload: Option<&'a [u8]>,
    content_type: Option<&'a str>,
    hash: Option<Vec<u8>>,
    ext: Option<&'a str>,
    app: Option<&'a str>,
    dlg: Option<&'a str>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a new request with the given method, host, port, and path.
    pub fn new(method: &'a str, host: &'a str, port: u16, path: &'a str) -> Self {
        RequestBuilder::default()
            .method(method)
            .host(host)
            .port(port)
            .path(path)
    }

    /// Create a new request with the host, port, and path determined from the URL.  The path
    /// includes the query but never the fragment, which is not sent on the wire.  A URL without
    /// an explicit port gets its scheme's default port.  The method must still be set.
    pub fn from_url(url: &'a Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("url {} has no host", url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::InvalidUrl(format!("url {} has no port", url)))?;
        Ok(RequestBuilder::default()
            .host(host)
            .port(port)
            .path(&url[Position::BeforePath..Position::AfterQuery]))
    }

    /// Set the request method. The method is upper-cased when signing.
    pub fn method(mut self, method: &'a str) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the URL path for the request, including any query.
    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the URL hostname for the request
    pub fn host(mut self, host: &'a str) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the URL port for the request
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the request payload.  Its hash is computed with the credentials' algorithm when a
    /// header is made or validated, unless a hash was given explicitly.
    pub fn payload<P: Into<Option<&'a [u8]>>>(mut self, payload: P) -> Self {
        self.payload = payload.into();
        self
    }

    /// Set the content type of the payload.  Parameters such as `charset` are ignored.
    pub fn content_type<S: Into<Option<&'a str>>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Set the content hash for the request, as computed by a `PayloadHasher`.
    pub fn hash<H: Into<Option<Vec<u8>>>>(mut self, hash: H) -> Self {
        self.hash = hash.into();
        self
    }

    /// Set the `ext` Hawk property for the request
    pub fn ext<S: Into<Option<&'a str>>>(mut self, ext: S) -> Self {
        self.ext = ext.into();
        self
    }

    /// Set the `app` Hawk property for the request
    pub fn app<S: Into<Option<&'a str>>>(mut self, app: S) -> Self {
        self.app = app.into();
        self
    }

    /// Set the `dlg` Hawk property for the request.  It is only signed when `app` is also set.
    pub fn dlg<S: Into<Option<&'a str>>>(mut self, dlg: S) -> Self {
        self.dlg = dlg.into();
        self
    }

    /// Get the request from this builder
    pub fn request(self) -> Result<Request<'a>> {
        Ok(Request {
            method: self.method.ok_or(Error::MissingOption("method"))?,
            path: self.path.ok_or(Error::MissingOption("path"))?,
            host: self.host.ok_or(Error::MissingOption("host"))?,
            port: self.port.ok_or(Error::MissingOption("port"))?,
            payload: self.payload,
            content_type: self.content_type,
            hash: self.hash,
            ext: self.ext,
            app: self.app,
            dlg: self.dlg,
        })
    }
}

/// The per-request values a client must remember in order to validate the server's response:
/// the timestamp and nonce it sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState {
    pub ts: SystemTime,
    pub nonce: String,
}

impl RequestState {
    /// A fresh state: the current time and a new random nonce.
    pub fn new() -> Result<RequestState> {
        Ok(RequestState {
            ts: SystemTime::now(),
            nonce: random_nonce()?,
        })
    }

    /// Recover the state from a request header, as a server does before signing its response.
    pub fn from_header(header: &Header) -> Option<RequestState> {
        Some(RequestState {
            ts: header.ts?,
            nonce: header.nonce.clone()?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::DigestAlgorithm;
    use crate::header::HeaderField;
    use pretty_assertions::assert_eq;
    use std::time::UNIX_EPOCH;

    fn rainbow_credentials(algorithm: DigestAlgorithm) -> Credentials {
        Credentials::new("123456", "2983d45yun89q", algorithm).unwrap()
    }

    fn rainbow_request<'a>() -> RequestBuilder<'a> {
        RequestBuilder::new("POST", "example.net", 80, "/somewhere/over/the/rainbow")
            .payload("something to write about".as_bytes())
            .ext("Bazinga!")
    }

    fn rainbow_ts() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1353809207)
    }

    #[test]
    fn test_empty() {
        let req = RequestBuilder::default();
        assert!(matches!(
            req.clone().request(),
            Err(Error::MissingOption("method"))
        ));
        assert!(matches!(
            req.clone().method("GET").request(),
            Err(Error::MissingOption("path"))
        ));
        assert!(matches!(
            req.clone().method("GET").path("/").request(),
            Err(Error::MissingOption("host"))
        ));
        assert!(matches!(
            req.method("GET").path("/").host("example.com").request(),
            Err(Error::MissingOption("port"))
        ));
    }

    #[test]
    fn test_builder() {
        let hash = vec![0u8];
        let req = RequestBuilder::new("GET", "example.com", 443, "/foo")
            .hash(Some(hash.clone()))
            .ext("ext")
            .app("app")
            .dlg("dlg")
            .request()
            .unwrap();

        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/foo");
        assert_eq!(req.host, "example.com");
        assert_eq!(req.port, 443);
        assert_eq!(req.hash, Some(hash));
        assert_eq!(req.ext, Some("ext"));
        assert_eq!(req.app, Some("app"));
        assert_eq!(req.dlg, Some("dlg"));
    }

    #[test]
    fn test_builder_clone() {
        let rb = RequestBuilder::new("GET", "localhost", 443, "/foo");
        let req = rb.clone().request().unwrap();
        let req2 = rb.path("/bar").request().unwrap();

        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/foo");
        assert_eq!(req2.method, "GET");
        assert_eq!(req2.path, "/bar");
    }

    #[test]
    fn test_url_builder() {
        let url = Url::parse("https://example.com/foo?x=1#frag").unwrap();
        let req = RequestBuilder::from_url(&url)
            .unwrap()
            .method("GET")
            .request()
            .unwrap();

        assert_eq!(req.path(), "/foo?x=1");
        assert_eq!(req.host(), "example.com");
        assert_eq!(req.port(), 443); // default for https
    }

    #[test]
    fn test_url_builder_with_port() {
        let url = Url::parse("http://example.com:8080/foo").unwrap();
        let req = RequestBuilder::from_url(&url)
            .unwrap()
            .method("GET")
            .request()
            .unwrap();
        assert_eq!(req.path(), "/foo");
        assert_eq!(req.port(), 8080);
    }

    #[test]
    fn test_url_builder_no_host() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert!(matches!(
            RequestBuilder::from_url(&url),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_make_header_full_sha256() {
        let req = rainbow_request().request().unwrap();
        let header = req
            .make_header_full(&rainbow_credentials(DigestAlgorithm::Sha256), rainbow_ts(), "Ygvqdz")
            .unwrap();
        assert_eq!(
            header.to_string(),
            "Hawk id=\"123456\", ts=\"1353809207\", nonce=\"Ygvqdz\", \
             hash=\"LjRmtkSKTW0ObTUyZ7N+vjClKd//KTTdfhF1M4XCuEM=\", ext=\"Bazinga!\", \
             mac=\"dh5kEkotNusOuHPolRYUhvy2vlhJybTC2pqBdUQk5z0=\""
        );
    }

    #[test]
    fn test_make_header_full_sha1() {
        let req = rainbow_request().request().unwrap();
        let header = req
            .make_header_full(&rainbow_credentials(DigestAlgorithm::Sha1), rainbow_ts(), "Ygvqdz")
            .unwrap();
        assert_eq!(
            header.mac.map(|mac| mac.to_base64()),
            Some("qbf1ZPG/r/e06F4ht+T77LXi5vw=".to_string())
        );
        assert_eq!(
            header.hash.map(b64::encode),
            Some("bsvY3IfUllw6V5rvk4tStEvpBhE=".to_string())
        );
    }

    #[test]
    fn test_make_header_without_payload() {
        let req = rainbow_request().payload(None).request().unwrap();
        let header = req
            .make_header_full(&rainbow_credentials(DigestAlgorithm::Sha256), rainbow_ts(), "Ygvqdz")
            .unwrap();
        assert_eq!(header.hash, None);
        assert_eq!(
            header.mac.map(|mac| mac.to_base64()),
            Some("Kr1jDLX4mZxWjQg8mRtTB9PH2iPJMDiVGk8b5Pb2oNc=".to_string())
        );
    }

    #[test]
    fn test_explicit_hash_matches_payload() {
        let credentials = rainbow_credentials(DigestAlgorithm::Sha256);
        let hash = PayloadHasher::hash("", DigestAlgorithm::Sha256, "something to write about");
        let by_hash = rainbow_request()
            .payload(None)
            .hash(hash)
            .request()
            .unwrap()
            .make_header_full(&credentials, rainbow_ts(), "Ygvqdz")
            .unwrap();
        let by_payload = rainbow_request()
            .request()
            .unwrap()
            .make_header_full(&credentials, rainbow_ts(), "Ygvqdz")
            .unwrap();
        assert_eq!(by_hash, by_payload);
    }

    #[test]
    fn test_make_header_deterministic() {
        let credentials = rainbow_credentials(DigestAlgorithm::Sha256);
        let req = rainbow_request().request().unwrap();
        let h1 = req.make_header_full(&credentials, rainbow_ts(), "Ygvqdz").unwrap();
        let h2 = req.make_header_full(&credentials, rainbow_ts(), "Ygvqdz").unwrap();
        assert_eq!(h1.to_string(), h2.to_string());
    }

    #[test]
    fn test_make_header_subset() {
        let req = rainbow_request().request().unwrap();
        let header = req
            .make_header_full(&rainbow_credentials(DigestAlgorithm::Sha256), rainbow_ts(), "Ygvqdz")
            .unwrap();
        assert_eq!(
            header.serialize(Some(&[HeaderField::Id, HeaderField::Mac])),
            "Hawk id=\"123456\", mac=\"dh5kEkotNusOuHPolRYUhvy2vlhJybTC2pqBdUQk5z0=\""
        );
    }

    #[test]
    fn test_make_header_app_dlg() {
        let key = vec![
            11u8, 19, 228, 209, 79, 189, 200, 59, 166, 47, 86, 254, 235, 184, 120, 197, 75, 152,
            201, 79, 115, 61, 111, 242, 219, 187, 173, 14, 227, 108, 60, 232,
        ];
        let credentials = Credentials::new("me", key, DigestAlgorithm::Sha256).unwrap();
        let req = RequestBuilder::new("POST", "mysite.com", 443, "/v1/api")
            .app("my-app")
            .dlg("my-dlg")
            .request()
            .unwrap();
        let header = req
            .make_header_full(
                &credentials,
                UNIX_EPOCH + Duration::from_secs(1353832834),
                "nonny",
            )
            .unwrap();
        assert_eq!(
            header.to_string(),
            "Hawk id=\"me\", ts=\"1353832834\", nonce=\"nonny\", app=\"my-app\", \
             dlg=\"my-dlg\", mac=\"o3EKTRY1tabg51prdVzcy+gLVBo2xOcn45u7EupSeEs=\""
        );
    }

    #[test]
    fn test_make_header_dlg_without_app() {
        let key = vec![
            11u8, 19, 228, 209, 79, 189, 200, 59, 166, 47, 86, 254, 235, 184, 120, 197, 75, 152,
            201, 79, 115, 61, 111, 242, 219, 187, 173, 14, 227, 108, 60, 232,
        ];
        let credentials = Credentials::new("me", key, DigestAlgorithm::Sha256).unwrap();
        let req = RequestBuilder::new("POST", "mysite.com", 443, "/v1/api")
            .dlg("my-dlg")
            .request()
            .unwrap();
        let header = req
            .make_header_full(
                &credentials,
                UNIX_EPOCH + Duration::from_secs(1353832834),
                "nonny",
            )
            .unwrap();
        assert!(header.dlg.is_none());
        assert_eq!(
            header.to_string(),
            "Hawk id=\"me\", ts=\"1353832834\", nonce=\"nonny\", \
             mac=\"fiy4e5wBdapDNxHHeA18NrSrU1U3iS66gm0XjTJpYyU=\""
        );
    }

    #[test]
    fn test_make_header_quote_in_ext() {
        let req = rainbow_request().ext("a\"b").request().unwrap();
        assert!(matches!(
            req.make_header(&rainbow_credentials(DigestAlgorithm::Sha256)),
            Err(Error::InvalidComponent("ext"))
        ));
    }

    #[test]
    fn test_make_header_fresh_nonce() {
        let credentials = rainbow_credentials(DigestAlgorithm::Sha256);
        let req = rainbow_request().request().unwrap();
        let h1 = req.make_header(&credentials).unwrap();
        let h2 = req.make_header(&credentials).unwrap();
        assert_ne!(h1.nonce, h2.nonce);
        assert_eq!(h1.nonce.map(|n| n.len()), Some(16));
    }

    #[test]
    fn test_make_bewit() {
        let credentials = rainbow_credentials(DigestAlgorithm::Sha256);
        let req = RequestBuilder::new("GET", "example.com", 80, "/resource/4?a=1&b=2")
            .ext("some-app-data")
            .request()
            .unwrap();
        let bewit = req
            .make_bewit(&credentials, UNIX_EPOCH + Duration::from_secs(1353832834))
            .unwrap();
        assert_eq!(
            bewit.mac().to_base64(),
            "yUceMiJOMRc5gJZ17oujJJj5QhyY/0SNwNEUEBYRmc0="
        );
        assert_eq!(
            bewit.to_str(),
            "MTIzNDU2XDEzNTM4MzI4MzRceVVjZU1pSk9NUmM1Z0paMTdvdWpKSmo1UWh5WS8wU053TkVVRUJZUm1jMD1cc29tZS1hcHAtZGF0YQ"
        );
    }

    #[test]
    fn test_make_bewit_backslash() {
        let credentials = rainbow_credentials(DigestAlgorithm::Sha256);
        let req = RequestBuilder::new("GET", "example.com", 80, "/")
            .ext("a\\b")
            .request()
            .unwrap();
        assert!(matches!(
            req.make_bewit_with_ttl(&credentials, Duration::from_secs(60)),
            Err(Error::InvalidComponent("ext"))
        ));
    }

    #[test]
    fn test_request_state_from_header() {
        let req = rainbow_request().request().unwrap();
        let header = req
            .make_header_full(&rainbow_credentials(DigestAlgorithm::Sha256), rainbow_ts(), "Ygvqdz")
            .unwrap();
        assert_eq!(
            RequestState::from_header(&header),
            Some(RequestState {
                ts: rainbow_ts(),
                nonce: "Ygvqdz".to_string(),
            })
        );
        let empty = Header::new::<String>(None, None, None, None, None, None, None, None).unwrap();
        assert_eq!(RequestState::from_header(&empty), None);
    }
}
