// ── Address resolver ──
//
// Live lightpad id → address table fed by discovery responses. Owns the
// address records; handles never store addresses themselves.

use std::net::SocketAddr;

use chrono::Utc;
use dashmap::DashMap;
use plumly_api::{DEFAULT_STREAM_PORT, DiscoverySocket, parse_announcement};
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::model::{AddressRecord, LightpadId};

/// State transition produced by a discovery response, applied to the
/// registry by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReachabilityEvent {
    Reachable(LightpadId),
}

#[derive(Default)]
pub struct AddressResolver {
    records: DashMap<LightpadId, AddressRecord>,
}

impl AddressResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a discovery socket and broadcast one request.
    ///
    /// Answers arrive on the returned socket; feed them to
    /// [`on_discovery_response`](Self::on_discovery_response).
    pub async fn start_discovery(&self, port: u16) -> Result<DiscoverySocket, CoreError> {
        let socket = DiscoverySocket::bind(port)
            .await
            .map_err(CoreError::Discovery)?;
        socket.broadcast().await.map_err(CoreError::Discovery)?;
        Ok(socket)
    }

    /// Handle one datagram. Malformed datagrams are dropped and return `None`.
    pub fn on_discovery_response(&self, raw: &[u8], sender: SocketAddr) -> Option<ReachabilityEvent> {
        let announcement = match parse_announcement(raw) {
            Ok(a) => a,
            Err(e) => {
                trace!(%sender, error = %e, "ignoring discovery datagram");
                return None;
            }
        };

        let lpid = LightpadId::from(announcement.lpid);
        debug!(%lpid, address = %sender.ip(), port = announcement.command_port, "lightpad discovered");
        self.upsert(AddressRecord {
            lpid: lpid.clone(),
            address: sender.ip(),
            command_port: announcement.command_port,
            stream_port: DEFAULT_STREAM_PORT,
            last_seen: Utc::now(),
        });
        Some(ReachabilityEvent::Reachable(lpid))
    }

    /// Insert or overwrite a record.
    pub fn upsert(&self, record: AddressRecord) {
        self.records.insert(record.lpid.clone(), record);
    }

    pub fn lookup(&self, lpid: &LightpadId) -> Option<AddressRecord> {
        self.records.get(lpid).map(|r| r.value().clone())
    }

    pub fn is_reachable(&self, lpid: &LightpadId) -> bool {
        self.records.contains_key(lpid)
    }

    /// All records, ordered by lightpad id.
    pub fn snapshot(&self) -> Vec<AddressRecord> {
        let mut records: Vec<AddressRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.lpid.cmp(&b.lpid));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
