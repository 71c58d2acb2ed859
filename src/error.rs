use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised for caller mistakes and for malformed input to the typed parsers.
///
/// Authentication outcomes (stale timestamps, replayed nonces, bad MACs, ..) are not errors;
/// they are reported through [`Authentication`](crate::Authentication).
#[derive(Error, Debug)]
pub enum Error {
    #[error("`{0}` is missing from the request")]
    MissingOption(&'static str),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("{0:?} is not a supported algorithm; use one of: sha256, sha1")]
    UnsupportedAlgorithm(String),

    #[error("Hawk header component `{0}` cannot contain `\"`")]
    InvalidComponent(&'static str),

    #[error("Unparseable Hawk header: {0}")]
    HeaderParseError(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    InvalidBewit(#[from] InvalidBewit),

    #[error("Base64 Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("RNG error: {0}")]
    Rng(#[from] rand::Error),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum InvalidBewit {
    #[error("Multiple bewits in URL")]
    Multiple,
    #[error("Invalid bewit format")]
    Format,
    #[error("Invalid bewit id")]
    Id,
    #[error("Invalid bewit exp")]
    Exp,
    #[error("Invalid bewit mac")]
    Mac,
    #[error("Invalid bewit ext")]
    Ext,
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}
