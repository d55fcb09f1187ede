// ── Platform ──
//
// Wires the resolver, topology client, registry and controller together,
// owns the discovery background tasks and exposes the characteristic
// handlers the accessory layer calls into.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use plumly_api::{DiscoverySocket, LightpadClient};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::accessory::AccessoryLayer;
use crate::address::{AddressResolver, ReachabilityEvent};
use crate::cloud::TopologyClient;
use crate::config::PlatformConfig;
use crate::controller::DeviceController;
use crate::error::{CloudError, CommandError, CoreError};
use crate::model::{DeviceHandle, LightpadId, MAX_PERCENT};
use crate::reconcile::{ReconcilePlan, reconcile};
use crate::store::DeviceRegistry;

const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(500);

/// Counts of what one reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

/// One cloud account's worth of lightpads.
///
/// Cheaply cloneable; clones share the same registry and background tasks.
#[derive(Clone)]
pub struct Platform {
    inner: Arc<PlatformInner>,
}

struct PlatformInner {
    config: PlatformConfig,
    registry: Arc<DeviceRegistry>,
    resolver: Arc<AddressResolver>,
    topology: TopologyClient,
    controller: DeviceController,
    accessory: Arc<dyn AccessoryLayer>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Platform {
    /// Build a platform from configuration. Does not touch the network;
    /// call [`start`](Self::start) for that.
    pub fn new(config: PlatformConfig, accessory: Arc<dyn AccessoryLayer>) -> Result<Self, CoreError> {
        let topology = TopologyClient::new(&config)?;
        let client = LightpadClient::new(&config.lightpad_transport()).map_err(|e| {
            CoreError::Config {
                message: e.to_string(),
            }
        })?;
        Ok(Self::from_parts(config, topology, client, accessory))
    }

    /// Build a platform around pre-built clients.
    pub fn from_parts(
        config: PlatformConfig,
        topology: TopologyClient,
        client: LightpadClient,
        accessory: Arc<dyn AccessoryLayer>,
    ) -> Self {
        let registry = Arc::new(DeviceRegistry::new());
        let resolver = Arc::new(AddressResolver::new());
        let controller = DeviceController::new(
            client,
            Arc::clone(&registry),
            Arc::clone(&resolver),
            Arc::clone(&accessory),
        );

        Self {
            inner: Arc::new(PlatformInner {
                config,
                registry,
                resolver,
                topology,
                controller,
                accessory,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.inner.registry
    }

    pub fn resolver(&self) -> &Arc<AddressResolver> {
        &self.inner.resolver
    }

    pub fn controller(&self) -> &DeviceController {
        &self.inner.controller
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Seed the registry with handles the host persisted. Reachability is
    /// recomputed from the resolver. Returns how many were new.
    pub fn restore(&self, handles: impl IntoIterator<Item = DeviceHandle>) -> usize {
        let resolver = &self.inner.resolver;
        let restored = self.inner.registry.restore(handles.into_iter().map(|mut handle| {
            handle.reachable = resolver.is_reachable(&handle.lpid);
            handle
        }));
        info!(restored, "restored cached devices");
        restored
    }

    /// Start discovery, then fetch and reconcile the cloud topology.
    ///
    /// A cloud failure is logged and leaves the registry as it was; only a
    /// discovery socket failure is an error.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.start_discovery().await?;

        match self.refresh_topology().await {
            Ok(summary) => info!(
                added = summary.added,
                updated = summary.updated,
                removed = summary.removed,
                "devices reconciled"
            ),
            Err(e) => warn!(error = %e, "failed to get devices from cloud"),
        }
        Ok(())
    }

    /// Broadcast a discovery request and spawn the listener (plus the
    /// periodic re-broadcast when configured).
    pub async fn start_discovery(&self) -> Result<(), CoreError> {
        let socket = Arc::new(
            self.inner
                .resolver
                .start_discovery(self.inner.config.discovery_port)
                .await?,
        );
        let mut handles = self.inner.task_handles.lock().await;

        handles.push(tokio::spawn(discovery_listener_task(
            self.clone(),
            Arc::clone(&socket),
            self.inner.cancel.child_token(),
        )));

        let interval_secs = self.inner.config.rediscovery_interval_secs;
        if interval_secs > 0 {
            handles.push(tokio::spawn(rediscovery_task(
                socket,
                interval_secs,
                self.inner.cancel.child_token(),
            )));
        }
        Ok(())
    }

    /// Fetch the topology and apply the reconciliation plan.
    pub async fn refresh_topology(&self) -> Result<ReconcileSummary, CloudError> {
        let topology = self.inner.topology.fetch_topology().await?;
        let plan = reconcile(&topology, &self.inner.registry.ids());
        Ok(self.apply_plan(plan))
    }

    /// Apply a plan to the registry and notify the accessory layer.
    pub fn apply_plan(&self, plan: ReconcilePlan) -> ReconcileSummary {
        let registry = &self.inner.registry;
        let accessory = &self.inner.accessory;
        let mut summary = ReconcileSummary::default();

        for lpid in &plan.to_remove {
            if registry.remove(lpid).is_some() {
                info!(%lpid, "removing device");
                accessory.unregister(lpid);
                summary.removed += 1;
            }
        }

        for (lpid, context) in plan.to_update {
            if registry.replace_context(&lpid, context) {
                debug!(%lpid, "updated device context");
                summary.updated += 1;
            }
        }

        for addition in plan.to_add {
            let mut handle = DeviceHandle::new(addition.lpid, addition.name, addition.context);
            handle.reachable = self.inner.resolver.is_reachable(&handle.lpid);
            info!(lpid = %handle.lpid, name = %handle.name, "adding device");
            registry.insert(handle.clone());
            accessory.register(&handle);
            summary.added += 1;
        }

        summary
    }

    /// Feed one discovery datagram through the resolver and the registry.
    /// Returns `true` if a handle became reachable.
    pub fn handle_datagram(&self, raw: &[u8], sender: SocketAddr) -> bool {
        let Some(event) = self.inner.resolver.on_discovery_response(raw, sender) else {
            return false;
        };
        if !self.inner.registry.apply_reachability(&event) {
            return false;
        }
        match event {
            ReachabilityEvent::Reachable(lpid) => {
                info!(%lpid, "device reachable");
                self.inner.accessory.update_reachability(&lpid, true);
            }
        }
        true
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("platform shut down");
    }

    // ── Characteristic handlers ──────────────────────────────────────

    /// Switch on or off. Turning on a dark device goes to full brightness;
    /// a request matching the cached state sends nothing.
    pub async fn set_on(&self, lpid: &LightpadId, on: bool) -> Result<(), CommandError> {
        let cached = self
            .inner
            .registry
            .characteristics(lpid)
            .ok_or_else(|| CommandError::UnknownDevice { lpid: lpid.clone() })?;

        if on && cached.brightness == 0 {
            self.inner.controller.set_level(lpid, MAX_PERCENT).await
        } else if !on && cached.brightness > 0 {
            self.inner.controller.set_level(lpid, 0).await
        } else {
            debug!(%lpid, on, "already in requested state");
            Ok(())
        }
    }

    /// Read the live level from the lightpad, then switch on or off.
    /// Returns the brightness the lightpad was left at.
    ///
    /// For callers whose cache may only hold the cloud's last-known level.
    pub async fn switch(&self, lpid: &LightpadId, on: bool) -> Result<u8, CommandError> {
        let before = self.inner.controller.get_level(lpid).await?;
        self.set_on(lpid, on).await?;
        Ok(self
            .inner
            .registry
            .characteristics(lpid)
            .map_or(before, |c| c.brightness))
    }

    pub async fn get_on(&self, lpid: &LightpadId) -> Result<bool, CommandError> {
        Ok(self.inner.controller.get_level(lpid).await? > 0)
    }

    pub async fn set_brightness(&self, lpid: &LightpadId, percent: u8) -> Result<(), CommandError> {
        self.inner.controller.set_level(lpid, percent).await
    }

    pub async fn get_brightness(&self, lpid: &LightpadId) -> Result<u8, CommandError> {
        self.inner.controller.get_level(lpid).await
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn discovery_listener_task(
    platform: Platform,
    socket: Arc<DiscoverySocket>,
    cancel: CancellationToken,
) {
    let socket = &*socket;
    listen(&platform, || socket.recv(), &cancel).await;
}

/// Feed received datagrams to the platform until cancelled. Receive errors
/// are logged and retried after [`RECV_ERROR_BACKOFF`].
async fn listen<F, Fut>(platform: &Platform, mut recv: F, cancel: &CancellationToken)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(Vec<u8>, SocketAddr), plumly_api::Error>>,
{
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            received = recv() => match received {
                Ok((raw, sender)) => {
                    platform.handle_datagram(&raw, sender);
                }
                Err(e) => {
                    warn!(error = %e, "discovery receive failed");
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(RECV_ERROR_BACKOFF) => {}
                    }
                }
            },
        }
    }
}

async fn rediscovery_task(socket: Arc<DiscoverySocket>, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("re-broadcasting discovery request");
                if let Err(e) = socket.broadcast().await {
                    warn!(error = %e, "discovery re-broadcast failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::net::{IpAddr, Ipv4Addr};

    use plumly_api::TransportConfig;

    use super::*;
    use crate::accessory::NoopAccessoryLayer;
    use crate::model::DeviceContext;
    use crate::model::fixtures::{house, load, room};

    type Received = Result<(Vec<u8>, SocketAddr), plumly_api::Error>;

    fn platform() -> Platform {
        let config = PlatformConfig::default();
        let topology = TopologyClient::new(&config).unwrap();
        let client = LightpadClient::new(&TransportConfig::lightpad()).unwrap();
        Platform::from_parts(config, topology, client, Arc::new(NoopAccessoryLayer))
    }

    #[tokio::test(start_paused = true)]
    async fn listener_keeps_going_after_receive_errors() {
        let platform = platform();
        let lpid = LightpadId::from("abcd-0001");
        platform.registry().insert(DeviceHandle::new(
            lpid.clone(),
            "Den Lamp".into(),
            DeviceContext {
                room: room("r1", "Den"),
                house: house("h1"),
                load: load("l1", "Lamp", &["abcd-0001"]),
            },
        ));

        let sender = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 43770);
        let mut queue: VecDeque<Received> = VecDeque::from([
            Err(plumly_api::Error::Io(std::io::Error::other("network down"))),
            Err(plumly_api::Error::Io(std::io::Error::other("network down"))),
            Ok((b"PLUM 8888 abcd-0001 8443".to_vec(), sender)),
        ]);
        let recv = move || {
            let next = queue.pop_front();
            async move {
                match next {
                    Some(received) => received,
                    None => std::future::pending().await,
                }
            }
        };

        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let platform = platform.clone();
            let cancel = cancel.clone();
            async move { listen(&platform, recv, &cancel).await }
        });

        for _ in 0..10 {
            if platform.registry().get(&lpid).unwrap().reachable {
                break;
            }
            tokio::time::sleep(RECV_ERROR_BACKOFF).await;
        }
        assert!(platform.registry().get(&lpid).unwrap().reachable);

        cancel.cancel();
        task.await.unwrap();
    }
}
