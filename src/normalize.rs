//! Normalized strings: the exact bytes that Hawk MACs and hashes are computed over.
//!
//! Fields are never escaped.  A newline embedded in any field passes through verbatim, which is
//! a property of the protocol shared by every interoperable implementation.

/// The kind of message a MAC authenticates; this selects the first line of the normalized
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacType {
    Header,
    Response,
    Bewit,
}

impl MacType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacType::Header => "header",
            MacType::Response => "response",
            MacType::Bewit => "bewit",
        }
    }
}

/// The values covered by a header, response or bewit MAC, after defaults have been applied.
///
/// `hash` is the base64 payload hash exactly as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artifacts<'a> {
    pub mac_type: MacType,
    pub ts: u64,
    pub nonce: &'a str,
    pub method: &'a str,
    pub path: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub hash: Option<&'a str>,
    pub ext: Option<&'a str>,
    pub app: Option<&'a str>,
    pub dlg: Option<&'a str>,
}

impl<'a> Artifacts<'a> {
    /// Build the normalized string for these artifacts.
    ///
    /// `app` and `dlg` are included only for header and response MACs, and only when `app` is
    /// set.
    pub fn normalized(&self) -> String {
        let mut parts: Vec<String> = vec![
            format!("hawk.1.{}", self.mac_type.as_str()),
            self.ts.to_string(),
            self.nonce.to_string(),
            self.method.to_uppercase(),
            self.path.to_string(),
            self.host.to_string(),
            self.port.to_string(),
            self.hash.unwrap_or("").to_string(),
            self.ext.unwrap_or("").to_string(),
        ];

        if self.mac_type != MacType::Bewit {
            if let Some(app) = self.app {
                parts.push(app.to_string());
                parts.push(self.dlg.unwrap_or("").to_string());
            }
        }

        // trailing newline
        parts.push(String::new());
        parts.join("\n")
    }
}

/// Reduce a `Content-Type` value to its media type: everything before the first `;`, with
/// surrounding whitespace removed.
pub fn normalize_content_type(content_type: &str) -> &str {
    match content_type.find(';') {
        Some(i) => content_type[..i].trim(),
        None => content_type.trim(),
    }
}

/// The part of the payload normalized string that precedes the payload bytes.  The payload
/// itself follows, and then a single `\n`.
pub fn payload_prefix(content_type: &str) -> String {
    format!("hawk.1.payload\n{}\n", normalize_content_type(content_type))
}

/// The normalized string for a timestamp MAC.
pub fn normalized_ts(ts: u64) -> String {
    format!("hawk.1.ts\n{}\n", ts)
}
