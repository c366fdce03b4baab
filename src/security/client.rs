//! Client identity used as the rate limit key.

use std::fmt;
use std::net::IpAddr;

const MAPPED_V4_PREFIX: &str = "::ffff:";

/// Normalized client identity.
///
/// IPv4 clients reaching a dual-stack socket show up as `::ffff:a.b.c.d`;
/// both spellings map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientKey(String);

impl ClientKey {
    /// Build a key from a socket peer address.
    pub fn from_ip(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => Self(v4.to_string()),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => Self(v4.to_string()),
                None => Self(v6.to_string()),
            },
        }
    }

    /// Build a key from a textual address, stripping the mapped-IPv4 prefix.
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        Self(raw.strip_prefix(MAPPED_V4_PREFIX).unwrap_or(raw).to_string())
    }

    /// Key for requests whose peer address is not known.
    pub fn unknown() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<IpAddr> for ClientKey {
    fn from(ip: IpAddr) -> Self {
        Self::from_ip(ip)
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
