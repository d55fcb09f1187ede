// UDP lightpad discovery
//
// A single broadcast of `PLUM` to port 43770; every lightpad on the subnet
// answers with `PLUM <ttl> <lpid> <port>`. The channel is best effort: no
// retransmission, no deduplication, malformed answers are dropped.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::Error;

/// Port lightpads listen on for discovery requests.
pub const DISCOVERY_PORT: u16 = 43770;

/// The discovery request datagram.
pub const DISCOVERY_PAYLOAD: &[u8; 4] = b"PLUM";

/// Stream port lightpads use; not carried in the announcement.
pub const DEFAULT_STREAM_PORT: u16 = 2708;

const MAX_DATAGRAM: usize = 1024;

static ANNOUNCEMENT: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"PLUM (\d+) ([a-f0-9\-]+) (\d+)").unwrap()
});

/// A parsed discovery response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub ttl: u32,
    pub lpid: String,
    pub command_port: u16,
}

/// Why a datagram was not a valid announcement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryParseError {
    #[error("datagram is not UTF-8")]
    NotUtf8,
    #[error("datagram does not match the announcement pattern")]
    NoMatch,
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

/// Parse a raw discovery response.
pub fn parse_announcement(raw: &[u8]) -> Result<Announcement, DiscoveryParseError> {
    let text = std::str::from_utf8(raw).map_err(|_| DiscoveryParseError::NotUtf8)?;
    let caps = ANNOUNCEMENT
        .captures(text)
        .ok_or(DiscoveryParseError::NoMatch)?;

    let (ttl, lpid, port) = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(ttl), Some(lpid), Some(port)) => (ttl.as_str(), lpid.as_str(), port.as_str()),
        _ => return Err(DiscoveryParseError::NoMatch),
    };

    Ok(Announcement {
        ttl: parse_field("ttl", ttl)?,
        lpid: lpid.to_owned(),
        command_port: parse_field("port", port)?,
    })
}

fn parse_field<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, DiscoveryParseError> {
    value.parse().map_err(|_| DiscoveryParseError::OutOfRange {
        field,
        value: value.to_owned(),
    })
}

/// Ephemeral UDP socket used both to broadcast the request and to receive
/// the answers.
pub struct DiscoverySocket {
    socket: UdpSocket,
    target: SocketAddr,
}

impl DiscoverySocket {
    /// Bind `0.0.0.0:0` with broadcast enabled, targeting the limited
    /// broadcast address on `port`.
    pub async fn bind(port: u16) -> Result<Self, Error> {
        let target = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::BROADCAST, port));
        Self::bind_to(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)), target).await
    }

    /// Bind an explicit local address and target. Tests use loopback here.
    pub async fn bind_to(local: SocketAddr, target: SocketAddr) -> Result<Self, Error> {
        let socket = UdpSocket::bind(local).await?;
        socket.set_broadcast(true)?;
        debug!(local = %socket.local_addr()?, %target, "discovery socket bound");
        Ok(Self { socket, target })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.socket.local_addr()?)
    }

    /// Send the discovery request.
    pub async fn broadcast(&self) -> Result<(), Error> {
        debug!(target = %self.target, "broadcasting discovery request");
        self.socket.send_to(DISCOVERY_PAYLOAD, self.target).await?;
        Ok(())
    }

    /// Wait for the next datagram, returning its bytes and sender.
    pub async fn recv(&self) -> Result<(Vec<u8>, SocketAddr), Error> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (len, sender) = self.socket.recv_from(&mut buf).await?;
        buf.truncate(len);
        Ok((buf, sender))
    }
}
