use crate::b64;
use crate::error::*;
use crate::mac::Mac;
use crate::util::{from_unix_seconds, unix_seconds};
use std::borrow::Cow;
use std::str;
use std::str::FromStr;
use std::time::SystemTime;

const BEWIT_PARAM: &str = "bewit=";
const BACKSLASH: u8 = b'\\';

/// A Bewit is a piece of data attached to a GET request that functions in place of a Hawk
/// Authentication header.  It contains an id, an expiration time, a MAC, and an optional `ext`
/// value.  These are available using accessor functions.
#[derive(Clone, Debug, PartialEq)]
pub struct Bewit {
    id: String,
    exp: SystemTime,
    mac: Mac,
    ext: Option<String>,
}

impl Bewit {
    /// Create a new Bewit with the given values.
    ///
    /// See `Request::make_bewit` for an easier way to make a Bewit.
    pub fn new<S>(id: S, exp: SystemTime, mac: Mac, ext: Option<S>) -> Bewit
    where
        S: Into<String>,
    {
        Bewit {
            id: id.into(),
            exp,
            mac,
            ext: ext.map(Into::into),
        }
    }

    /// Extract the `bewit` query parameter, if any, from the path.  If the path contains no bewit,
    /// the return value is `Ok(None)` and the path is not modified. If the path contains a valid
    /// bewit, the parameter is removed from the path and `Ok(Some(bewit))` returned.  If the path
    /// contains an invalid bewit, or more than one, the Result is an Err.
    ///
    /// The remaining query parameters and any fragment are kept byte-for-byte, so the path is
    /// the one the bewit was issued for.
    pub fn from_path(path: &mut Cow<'_, str>) -> Result<Option<Bewit>> {
        let (stripped, bewit) = match split_bewit(path)? {
            (_, None) => return Ok(None),
            (stripped, Some(token)) => (stripped.into_owned(), Bewit::from_str(token)?),
        };
        *path = Cow::Owned(stripped);
        Ok(Some(bewit))
    }

    /// Generate the fully-encoded string for this Bewit
    pub fn to_str(&self) -> String {
        let raw = format!(
            "{}\\{}\\{}\\{}",
            self.id,
            unix_seconds(self.exp),
            self.mac.to_base64(),
            self.ext.as_deref().unwrap_or(""),
        );

        b64::encode_url_no_pad(raw)
    }

    /// Get the Bewit's client identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the expiration time of the bewit
    pub fn exp(&self) -> SystemTime {
        self.exp
    }

    /// Get the MAC included in the Bewit
    pub fn mac(&self) -> &Mac {
        &self.mac
    }

    /// Get the Bewit's `ext` field.
    pub fn ext(&self) -> Option<&str> {
        self.ext.as_deref()
    }
}

/// Remove the `bewit` parameter from the query of `path`, returning the remaining path and the
/// parameter's value.  Other parameters keep their order; a query left empty loses its `?`.
pub(crate) fn split_bewit(path: &str) -> Result<(Cow<'_, str>, Option<&str>)> {
    let (before_fragment, fragment) = match path.find('#') {
        Some(i) => path.split_at(i),
        None => (path, ""),
    };
    let (base, query) = match before_fragment.split_once('?') {
        Some(parts) => parts,
        None => return Ok((Cow::Borrowed(path), None)),
    };

    let mut token = None;
    let mut kept: Vec<&str> = vec![];
    for param in query.split('&') {
        match param.strip_prefix(BEWIT_PARAM) {
            Some(_) if token.is_some() => return Err(InvalidBewit::Multiple.into()),
            Some(value) => token = Some(value),
            None => kept.push(param),
        }
    }

    match token {
        None => Ok((Cow::Borrowed(path), None)),
        Some(token) => {
            let mut stripped = base.to_string();
            if !kept.is_empty() {
                stripped.push('?');
                stripped.push_str(&kept.join("&"));
            }
            stripped.push_str(fragment);
            Ok((Cow::Owned(stripped), Some(token)))
        }
    }
}

impl FromStr for Bewit {
    type Err = Error;
    fn from_str(bewit: &str) -> Result<Bewit> {
        let bewit = b64::decode_url(bewit)?;

        let parts: Vec<&[u8]> = bewit.split(|c| *c == BACKSLASH).collect();
        if parts.len() != 4 {
            return Err(InvalidBewit::Format.into());
        }

        let id = str::from_utf8(parts[0]).map_err(|_| InvalidBewit::Id)?;
        if id.is_empty() {
            return Err(InvalidBewit::Id.into());
        }

        let exp = str::from_utf8(parts[1]).map_err(|_| InvalidBewit::Exp)?;
        let exp = u64::from_str(exp).map_err(|_| InvalidBewit::Exp)?;
        let exp = from_unix_seconds(exp).ok_or(InvalidBewit::Exp)?;

        let mac = str::from_utf8(parts[2]).map_err(|_| InvalidBewit::Mac)?;
        let mac = b64::decode(mac).map_err(|_| InvalidBewit::Mac)?;
        if mac.is_empty() {
            return Err(InvalidBewit::Mac.into());
        }

        let ext = match parts[3].len() {
            0 => None,
            _ => Some(
                str::from_utf8(parts[3])
                    .map_err(|_| InvalidBewit::Ext)?
                    .to_string(),
            ),
        };

        Ok(Bewit {
            id: id.to_string(),
            exp,
            mac: Mac::from(mac),
            ext,
        })
    }
}
