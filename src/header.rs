use crate::b64;
use crate::error::*;
use crate::mac::Mac;
use crate::util::{from_unix_seconds, unix_seconds};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// A named attribute of a Hawk header.
///
/// The discriminant order is the order in which attributes are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderField {
    Id,
    Ts,
    Nonce,
    Hash,
    Ext,
    App,
    Dlg,
    Mac,
}

impl HeaderField {
    /// Every field, in emission order.
    pub const ALL: [HeaderField; 8] = [
        HeaderField::Id,
        HeaderField::Ts,
        HeaderField::Nonce,
        HeaderField::Hash,
        HeaderField::Ext,
        HeaderField::App,
        HeaderField::Dlg,
        HeaderField::Mac,
    ];

    /// The fields of a `Server-Authorization` header.
    pub const RESPONSE: [HeaderField; 3] = [HeaderField::Hash, HeaderField::Ext, HeaderField::Mac];

    pub fn name(&self) -> &'static str {
        match self {
            HeaderField::Id => "id",
            HeaderField::Ts => "ts",
            HeaderField::Nonce => "nonce",
            HeaderField::Hash => "hash",
            HeaderField::Ext => "ext",
            HeaderField::App => "app",
            HeaderField::Dlg => "dlg",
            HeaderField::Mac => "mac",
        }
    }
}

/// Parse a Hawk header into its raw attributes.
///
/// A leading `Hawk` scheme token is optional.  The remainder is split on commas, and each
/// segment of the form `name="value"` or `name='value'` contributes one entry.  Anything else
/// is skipped, so malformed input yields a partial (possibly empty) map rather than an error.
/// Interpreting the values is left to the caller.
pub fn parse(header: &str) -> HashMap<String, String> {
    strip_scheme(header.trim())
        .split(',')
        .filter_map(|segment| parse_segment(segment.trim()))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn strip_scheme(header: &str) -> &str {
    match header.get(..4) {
        Some(scheme) if scheme.eq_ignore_ascii_case("hawk") => {
            let rest = &header[4..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                header
            }
        }
        _ => header,
    }
}

fn parse_segment(segment: &str) -> Option<(&str, &str)> {
    let (name, quoted) = segment.split_once('=')?;
    let name = name.trim();
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }

    let quoted = quoted.trim_start();
    let quote = quoted.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = quoted[1..].strip_suffix(quote)?;
    if value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// Representation of a Hawk `Authorization` header value (the part following "Hawk ").
///
/// All fields are optional, although for specific purposes some fields must be present.
#[derive(Clone, PartialEq, Debug)]
pub struct Header {
    pub id: Option<String>,
    pub ts: Option<SystemTime>,
    pub nonce: Option<String>,
    pub mac: Option<Mac>,
    pub ext: Option<String>,
    pub hash: Option<Vec<u8>>,
    pub app: Option<String>,
    pub dlg: Option<String>,
}

impl Header {
    /// Create a new Header with the full set of Hawk fields.
    ///
    /// This is a low-level function. Headers are more often created from Requests or Responses.
    ///
    /// Note that none of the string-formatted header components can contain the character `\"`.
    #[allow(clippy::too_many_arguments)]
    pub fn new<S>(
        id: Option<S>,
        ts: Option<SystemTime>,
        nonce: Option<S>,
        mac: Option<Mac>,
        ext: Option<S>,
        hash: Option<Vec<u8>>,
        app: Option<S>,
        dlg: Option<S>,
    ) -> Result<Header>
    where
        S: Into<String>,
    {
        Ok(Header {
            id: Header::check_component("id", id)?,
            ts,
            nonce: Header::check_component("nonce", nonce)?,
            mac,
            ext: Header::check_component("ext", ext)?,
            hash,
            app: Header::check_component("app", app)?,
            dlg: Header::check_component("dlg", dlg)?,
        })
    }

    /// Check a header component for validity.
    fn check_component<S>(name: &'static str, value: Option<S>) -> Result<Option<String>>
    where
        S: Into<String>,
    {
        match value {
            Some(value) => {
                let value = value.into();
                if value.contains('"') {
                    return Err(Error::InvalidComponent(name));
                }
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// The wire value of a single field, if it is present.
    pub fn field(&self, field: HeaderField) -> Option<String> {
        match field {
            HeaderField::Id => self.id.clone(),
            HeaderField::Ts => self.ts.map(|ts| unix_seconds(ts).to_string()),
            HeaderField::Nonce => self.nonce.clone(),
            HeaderField::Hash => self.hash.as_ref().map(b64::encode),
            HeaderField::Ext => self.ext.clone(),
            HeaderField::App => self.app.clone(),
            HeaderField::Dlg => self.dlg.clone(),
            HeaderField::Mac => self.mac.as_ref().map(|mac| mac.to_base64()),
        }
    }

    /// Serialize this header as a complete header value, including the `Hawk` scheme.
    ///
    /// Fields are emitted in the canonical order, restricted to `only` when given; fields that
    /// are not present are skipped.
    pub fn serialize(&self, only: Option<&[HeaderField]>) -> String {
        let mut fields: Vec<HeaderField> = only.unwrap_or(&HeaderField::ALL[..]).to_vec();
        fields.sort();
        fields.dedup();

        let parts: Vec<String> = fields
            .into_iter()
            .filter_map(|field| {
                self.field(field)
                    .map(|value| format!("{}=\"{}\"", field.name(), value))
            })
            .collect();
        format!("Hawk {}", parts.join(", "))
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.serialize(None))
    }
}

impl FromStr for Header {
    type Err = Error;
    fn from_str(s: &str) -> Result<Header> {
        let mut fields = parse(s);

        let ts = match fields.remove("ts") {
            Some(ts) => Some(
                u64::from_str(&ts)
                    .ok()
                    .and_then(from_unix_seconds)
                    .ok_or_else(|| {
                        Error::HeaderParseError(format!("Invalid timestamp {:?}", ts))
                    })?,
            ),
            None => None,
        };
        let mac = match fields.remove("mac") {
            Some(mac) => Some(Mac::from(b64::decode(&mac).map_err(|e| {
                Error::HeaderParseError(format!("Invalid mac: {}", e))
            })?)),
            None => None,
        };
        let hash = match fields.remove("hash") {
            Some(hash) => Some(b64::decode(&hash).map_err(|e| {
                Error::HeaderParseError(format!("Invalid hash: {}", e))
            })?),
            None => None,
        };

        Ok(Header {
            id: fields.remove("id"),
            ts,
            nonce: fields.remove("nonce"),
            mac,
            ext: fields.remove("ext"),
            hash,
            app: fields.remove("app"),
            dlg: fields.remove("dlg"),
        })
    }
}
