//! The `hawk_auth` crate provides support for [Hawk](https://github.com/hueniverse/hawk)
//! authentication. It is a low-level crate, used by higher-level crates to integrate with various
//! Rust HTTP libraries; it never touches the network itself.
//!
//! # Examples
//!
//! ## Hawk Client
//!
//! A client can attach a Hawk Authorization header to requests by providing credentials to a
//! Request instance, which will generate the header.
//!
//! ```
//! use hawk_auth::{RequestBuilder, Credentials, DigestAlgorithm};
//!
//! // provide the Hawk id and key
//! let credentials = Credentials::new("test-client", "no-secret", DigestAlgorithm::Sha256)
//!     .unwrap();
//!
//! let payload = "{\"some\": \"payload\"}".as_bytes();
//!
//! // provide the details of the request to be authorized
//! let request = RequestBuilder::new("POST", "example.com", 80, "/v1/users")
//!     .payload(payload)
//!     .content_type("application/json")
//!     .request()
//!     .unwrap();
//!
//! // Get the resulting header, including the calculated MAC; this involves a random
//! // nonce, so the MAC will be different on every request.
//! let header = request.make_header(&credentials).unwrap();
//!
//! // the header would then be attached to the request
//! let header = header.to_string();
//! assert!(header.starts_with("Hawk id=\"test-client\", ts=\""));
//! assert!(header.contains("hash=\""));
//! ```
//!
//! ## Hawk Server
//!
//! To act as a server, build a Request from the incoming HTTP request and authenticate the
//! Authorization header against it.  Rejections are ordinary values carrying the failing field,
//! and can be rendered into a `WWW-Authenticate` challenge.
//!
//! ```
//! use hawk_auth::{Authentication, Credentials, DigestAlgorithm, RequestBuilder, Server};
//! use std::time::SystemTime;
//!
//! let lookup = |id: &str| {
//!     if id == "dh37fgj492je" {
//!         Credentials::new(id, "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn",
//!                          DigestAlgorithm::Sha256).ok()
//!     } else {
//!         None
//!     }
//! };
//! let server = Server::new(&lookup);
//!
//! let request = RequestBuilder::new("GET", "localhost", 443, "/resource").request().unwrap();
//! let header = "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"j4h3g2\", \
//!               mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\"";
//!
//! match server.authenticate(header, &request) {
//!     Authentication::Authenticated(credentials) => println!("hello, {}", credentials.id),
//!     Authentication::Failed(failure) => {
//!         // this header is from 2012, so it is long since stale
//!         assert_eq!(failure.message(), "Stale ts");
//!         let challenge = failure.challenge(SystemTime::now());
//!         assert!(challenge.contains("tsm=\""));
//!     }
//! }
//! ```
//!
//! ## Bewits
//!
//! A bewit grants GET access to a single URL until it expires, without a header.
//!
//! ```
//! use hawk_auth::{Bewit, Credentials, DigestAlgorithm, RequestBuilder, Server};
//! use std::borrow::Cow;
//! use std::time::Duration;
//!
//! let credentials = Credentials::new("me", "tok", DigestAlgorithm::Sha256).unwrap();
//! let request = RequestBuilder::new("GET", "example.com", 443, "/download?file=a")
//!     .request()
//!     .unwrap();
//! let bewit = request
//!     .make_bewit_with_ttl(&credentials, Duration::from_secs(300))
//!     .unwrap();
//! let path = format!("/download?file=a&bewit={}", bewit.to_str());
//!
//! // on the server
//! let lookup = |_: &str| Some(credentials.clone());
//! let mut stripped = Cow::Borrowed(path.as_str());
//! let found = Bewit::from_path(&mut stripped).unwrap().unwrap();
//! assert_eq!(stripped, "/download?file=a");
//! let request = RequestBuilder::new("GET", "example.com", 443, &path).request().unwrap();
//! assert!(Server::new(&lookup)
//!     .authenticate_bewit(&found.to_str(), &request)
//!     .is_authenticated());
//! ```

pub mod b64;
pub mod crypto;

mod error;
pub use crate::error::*;

mod clock;
pub use crate::clock::{Clock, SystemClock};

mod credentials;
pub use crate::credentials::{Credentials, CredentialsLookup, Key, NonceLookup};

mod normalize;
pub use crate::normalize::{Artifacts, MacType};

mod header;
pub use crate::header::{parse as parse_header, Header, HeaderField};

mod mac;
pub use crate::mac::Mac;

mod payload;
pub use crate::payload::PayloadHasher;

mod request;
pub use crate::request::{Request, RequestBuilder, RequestState};

mod response;
pub use crate::response::{Response, ResponseBuilder};

mod outcome;
pub use crate::outcome::{Authentication, Failure, FailureField};

mod server;
pub use crate::server::{Server, DEFAULT_TIMESTAMP_SKEW};

mod bewit;
pub use crate::bewit::Bewit;

mod tsm;
pub use crate::tsm::TimestampMac;

mod util;

pub use crate::crypto::DigestAlgorithm;
