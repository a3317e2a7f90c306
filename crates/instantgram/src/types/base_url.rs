//! Where the Instantgram backend lives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use url::{Host, Url};

use crate::error::{Error, InvalidInputError};

/// Address of a backend started locally with its stock settings.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Root URL that every `/api/v1/...` path is joined onto.
///
/// Plain HTTP is accepted only for loopback hosts, since bearer and refresh
/// tokens travel with every request. A path prefix (a gateway mount point,
/// say) is kept; a query string or fragment is refused.
///
/// ```
/// use instantgram::BaseUrl;
///
/// let base: BaseUrl = "https://gateway.example/instantgram".parse().unwrap();
/// assert_eq!(
///     base.endpoint("/api/v1/posts/feed"),
///     "https://gateway.example/instantgram/api/v1/posts/feed"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse and check a backend address.
    ///
    /// # Errors
    ///
    /// [`InvalidInputError::BaseUrl`] when the address does not parse, is not
    /// absolute, sends tokens over plain HTTP to a remote host, or carries a
    /// query or fragment.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let raw = s.as_ref();
        let reject = |reason: &str| -> Error {
            InvalidInputError::BaseUrl {
                value: raw.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let url = Url::parse(raw).map_err(|e| reject(&e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(reject("not an absolute URL"));
        }
        match url.scheme() {
            "https" => {}
            "http" if is_loopback(&url) => {}
            "http" => return Err(reject("plain HTTP is only allowed for loopback hosts")),
            other => return Err(reject(&format!("unsupported scheme '{}'", other))),
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(reject("query strings and fragments are not allowed"));
        }

        Ok(Self(url))
    }

    /// Absolute URL for an API path such as `/api/v1/posts/feed`.
    pub fn endpoint(&self, path: &str) -> String {
        let root = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", root, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(name)) => name.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip == Ipv4Addr::LOCALHOST,
        Some(Host::Ipv6(ip)) => ip == Ipv6Addr::LOCALHOST,
        None => false,
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
