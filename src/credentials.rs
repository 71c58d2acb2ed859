use crate::crypto::{DigestAlgorithm, HmacKey};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Hawk key.
///
/// While any sequence of bytes can be specified as a key, note that each digest algorithm has
/// a suggested key length, and that passwords should *not* be used as keys.  Keys of incorrect
/// length are handled according to the digest's implementation.
///
/// The key bytes are only held inside the HMAC state and never appear in `Debug` output.
#[derive(Clone)]
pub struct Key {
    algorithm: DigestAlgorithm,
    key: HmacKey,
}

impl Key {
    pub fn new<B>(key: B, algorithm: DigestAlgorithm) -> Result<Key>
    where
        B: AsRef<[u8]>,
    {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(Error::InvalidCredentials("key is missing".to_string()));
        }
        Ok(Key {
            algorithm,
            key: HmacKey::new(algorithm, key),
        })
    }

    /// Compute the MAC of `data` under this key.
    pub fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.key.sign(data)
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Hawk credentials: an ID and a key associated with that ID.  The digest algorithm
/// must be agreed between the server and the client, and the length of the key is
/// specific to that algorithm.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub id: String,
    pub key: Key,
}

impl Credentials {
    pub fn new<S, B>(id: S, key: B, algorithm: DigestAlgorithm) -> Result<Credentials>
    where
        S: Into<String>,
        B: AsRef<[u8]>,
    {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidCredentials("id is missing".to_string()));
        }
        Ok(Credentials {
            id,
            key: Key::new(key, algorithm)?,
        })
    }

    /// Build credentials from loosely-typed parts, such as a row from a credential store.
    ///
    /// Missing members fail with `InvalidCredentials` (checked in the order id, key,
    /// algorithm) before the algorithm name is checked for support.
    pub fn from_parts(
        id: Option<&str>,
        key: Option<&[u8]>,
        algorithm: Option<&str>,
    ) -> Result<Credentials> {
        let id = id.ok_or_else(|| Error::InvalidCredentials("id is missing".to_string()))?;
        let key = key.ok_or_else(|| Error::InvalidCredentials("key is missing".to_string()))?;
        let algorithm = algorithm
            .ok_or_else(|| Error::InvalidCredentials("algorithm is missing".to_string()))?;
        let algorithm = DigestAlgorithm::from_str(algorithm)?;
        Credentials::new(id, key, algorithm)
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.key.algorithm()
    }
}

/// Resolves the credentials for a Hawk id.  Returning `None` rejects the request with an
/// `id` failure.
pub trait CredentialsLookup {
    fn lookup(&self, id: &str) -> Option<Credentials>;
}

impl<F> CredentialsLookup for F
where
    F: Fn(&str) -> Option<Credentials>,
{
    fn lookup(&self, id: &str) -> Option<Credentials> {
        self(id)
    }
}

impl CredentialsLookup for HashMap<String, Credentials> {
    fn lookup(&self, id: &str) -> Option<Credentials> {
        self.get(id).cloned()
    }
}

/// Reports whether a nonce has been seen before within the replay window.
///
/// The implementation owns storage and expiry of seen nonces.
pub trait NonceLookup {
    fn seen(&self, nonce: &str) -> bool;
}

impl<F> NonceLookup for F
where
    F: Fn(&str) -> bool,
{
    fn seen(&self, nonce: &str) -> bool {
        self(nonce)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_sha256() {
        let key = vec![77u8; 32];
        let key = Key::new(key, DigestAlgorithm::Sha256).unwrap();
        assert_eq!(key.algorithm(), DigestAlgorithm::Sha256);
        assert_eq!(key.sign(b"data").len(), 32);
    }

    #[test]
    fn test_new_sha256_bad_length() {
        let key = vec![0u8; 99];
        assert!(Key::new(key, DigestAlgorithm::Sha256).is_ok());
    }

    #[test]
    fn test_empty_key() {
        assert!(matches!(
            Key::new("", DigestAlgorithm::Sha1),
            Err(Error::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = Credentials::new("me", "2983d45yun89q", DigestAlgorithm::Sha256).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("me"));
        assert!(debug.contains("Sha256"));
        assert!(!debug.contains("2983d45yun89q"));
    }

    #[test]
    fn test_from_parts() {
        let creds =
            Credentials::from_parts(Some("123456"), Some(&b"2983d45yun89q"[..]), Some("sha1"))
                .unwrap();
        assert_eq!(creds.id, "123456");
        assert_eq!(creds.algorithm(), DigestAlgorithm::Sha1);
    }

    #[test]
    fn test_from_parts_missing_members() {
        let key: &[u8] = b"2983d45yun89q";
        assert!(matches!(
            Credentials::from_parts(None, Some(key), Some("sha256")),
            Err(Error::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::from_parts(Some("123456"), None, Some("sha256")),
            Err(Error::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::from_parts(Some("123456"), Some(key), None),
            Err(Error::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::from_parts(Some(""), Some(key), Some("sha256")),
            Err(Error::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_from_parts_unsupported_algorithm() {
        let key: &[u8] = b"2983d45yun89q";
        assert!(matches!(
            Credentials::from_parts(Some("123456"), Some(key), Some("foobar")),
            Err(Error::UnsupportedAlgorithm(_))
        ));
        // a missing member is reported before an unsupported algorithm
        assert!(matches!(
            Credentials::from_parts(None, Some(key), Some("foobar")),
            Err(Error::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_lookups() {
        let creds = Credentials::new("me", "secret", DigestAlgorithm::Sha256).unwrap();
        let mut map = HashMap::new();
        map.insert("me".to_string(), creds.clone());
        assert_eq!(map.lookup("me").map(|c| c.id), Some("me".to_string()));
        assert!(map.lookup("you").is_none());

        let by_closure = |id: &str| -> Option<Credentials> {
            if id == "me" {
                Some(creds.clone())
            } else {
                None
            }
        };
        assert!(by_closure.lookup("me").is_some());
        assert!(by_closure.lookup("you").is_none());

        let nonces = |nonce: &str| nonce == "used";
        assert!(nonces.seen("used"));
        assert!(!nonces.seen("fresh"));
    }
}
