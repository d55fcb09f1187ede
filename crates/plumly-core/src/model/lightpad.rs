// ── Lightpad identity and address ──

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use plumly_api::LightpadEndpoint;
use serde::{Deserialize, Serialize};

/// Stable lightpad identifier, the join key between cloud topology and
/// discovered addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightpadId(String);

impl LightpadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LightpadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LightpadId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for LightpadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Where a lightpad was last heard from. Overwritten by every discovery
/// response; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRecord {
    pub lpid: LightpadId,
    pub address: IpAddr,
    pub command_port: u16,
    pub stream_port: u16,
    pub last_seen: DateTime<Utc>,
}

impl AddressRecord {
    /// The command endpoint for the local API.
    pub fn endpoint(&self) -> LightpadEndpoint {
        LightpadEndpoint::new(self.address, self.command_port)
    }
}
