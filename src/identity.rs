// src/identity.rs

//! Caller identity used as the admission key

use std::fmt;

const UNKNOWN_ORIGIN: &str = "unknown";
const USER_SEPARATOR: char = ':';

/// Identity of a caller: the network origin, optionally suffixed with the
/// authenticated user id (`"10.0.0.7:user-42"`). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Derive the identity from the connection origin and, once known, the
    /// authenticated subject. A missing or blank origin maps to `"unknown"`.
    pub fn from_origin(host: Option<&str>, user_id: Option<&str>) -> Self {
        let host = host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(UNKNOWN_ORIGIN);

        match user_id.map(str::trim).filter(|u| !u.is_empty()) {
            Some(user) => Self(format!("{host}{USER_SEPARATOR}{user}")),
            None => Self(host.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ClientIdentity> for String {
    fn from(identity: ClientIdentity) -> Self {
        identity.0
    }
}
