#![allow(clippy::unwrap_used)]
// Integration tests for `Platform`: reconciliation, discovery wiring and the
// on/off characteristic handlers.

mod common;

use std::sync::{Arc, Mutex, OnceLock};

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plumly_core::{
    AccessoryLayer, Characteristics, DeviceHandle, DeviceRegistry, LightpadId, Platform,
    PlatformConfig, ReconcileSummary,
};

use common::{announcement, lightpad_client, mount_single_house, topology_client};

// ── Helpers ─────────────────────────────────────────────────────────

/// Records every hook as a short string.
#[derive(Default)]
struct RecordingLayer {
    calls: Mutex<Vec<String>>,
}

impl RecordingLayer {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

impl AccessoryLayer for RecordingLayer {
    fn register(&self, handle: &DeviceHandle) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("register {} {}", handle.lpid, handle.reachable));
    }

    fn unregister(&self, lpid: &LightpadId) {
        self.calls.lock().unwrap().push(format!("unregister {lpid}"));
    }

    fn update_reachability(&self, lpid: &LightpadId, reachable: bool) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("reachable {lpid} {reachable}"));
    }

    fn update_characteristics(&self, lpid: &LightpadId, characteristics: Characteristics) {
        self.calls.lock().unwrap().push(format!(
            "characteristics {lpid} {} {}",
            characteristics.on, characteristics.brightness
        ));
    }
}

fn platform(server: &MockServer) -> (Platform, Arc<RecordingLayer>) {
    let layer = Arc::new(RecordingLayer::default());
    let platform = Platform::from_parts(
        PlatformConfig::default(),
        topology_client(server),
        lightpad_client(),
        Arc::clone(&layer) as Arc<dyn AccessoryLayer>,
    );
    (platform, layer)
}

fn id(s: &str) -> LightpadId {
    LightpadId::from(s)
}

// ── Reconciliation ──────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_adds_updates_and_removes() {
    let server = MockServer::start().await;
    let (platform, layer) = platform(&server);

    mount_single_house(&server, &["aaaa-0001", "aaaa-0002"]).await;
    let summary = platform.refresh_topology().await.unwrap();
    assert_eq!(
        summary,
        ReconcileSummary {
            added: 2,
            updated: 0,
            removed: 0
        }
    );
    assert_eq!(
        layer.take(),
        vec!["register aaaa-0001 false", "register aaaa-0002 false"]
    );

    server.reset().await;
    mount_single_house(&server, &["aaaa-0001", "aaaa-0003"]).await;
    let summary = platform.refresh_topology().await.unwrap();
    assert_eq!(
        summary,
        ReconcileSummary {
            added: 1,
            updated: 1,
            removed: 1
        }
    );
    assert_eq!(
        layer.take(),
        vec!["unregister aaaa-0002", "register aaaa-0003 false"]
    );

    let mut ids = platform.registry().ids();
    ids.sort();
    assert_eq!(ids, vec![id("aaaa-0001"), id("aaaa-0003")]);
    assert_eq!(
        platform.registry().get(&id("aaaa-0003")).unwrap().name,
        "Kitchen Island"
    );
}

#[tokio::test]
async fn test_cloud_failure_keeps_registry() {
    let server = MockServer::start().await;
    let (platform, layer) = platform(&server);

    mount_single_house(&server, &["aaaa-0001"]).await;
    platform.refresh_topology().await.unwrap();
    layer.take();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/v2/getHouses"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(platform.refresh_topology().await.is_err());
    assert_eq!(platform.registry().ids(), vec![id("aaaa-0001")]);
    assert!(layer.take().is_empty());
}

#[tokio::test]
async fn test_added_device_seeded_reachable_when_already_discovered() {
    let server = MockServer::start().await;
    let (platform, layer) = platform(&server);

    let (raw, sender) = announcement("aaaa-0001", &server);
    // No handle yet: the address is recorded, nothing flips.
    assert!(!platform.handle_datagram(&raw, sender));
    assert!(platform.resolver().lookup(&id("aaaa-0001")).is_some());

    mount_single_house(&server, &["aaaa-0001"]).await;
    platform.refresh_topology().await.unwrap();

    assert!(platform.registry().get(&id("aaaa-0001")).unwrap().reachable);
    assert_eq!(layer.take(), vec!["register aaaa-0001 true"]);
}

#[tokio::test]
async fn test_restore_recomputes_reachability() {
    let server = MockServer::start().await;
    mount_single_house(&server, &["aaaa-0001", "aaaa-0002"]).await;

    let (first, _) = platform(&server);
    first.refresh_topology().await.unwrap();
    let persisted: Vec<DeviceHandle> = first
        .registry()
        .snapshot()
        .iter()
        .map(|h| (**h).clone())
        .collect();

    let (second, layer) = platform(&server);
    let (raw, sender) = announcement("aaaa-0002", &server);
    second.handle_datagram(&raw, sender);

    assert_eq!(second.restore(persisted), 2);
    assert!(!second.registry().get(&id("aaaa-0001")).unwrap().reachable);
    assert!(second.registry().get(&id("aaaa-0002")).unwrap().reachable);
    // Restored handles already exist on the host side.
    assert!(layer.take().is_empty());

    let summary = second.refresh_topology().await.unwrap();
    assert_eq!(summary.added, 0);
    assert_eq!(summary.updated, 2);
}

// ── Discovery ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_datagram_flips_reachability_once() {
    let server = MockServer::start().await;
    let (platform, layer) = platform(&server);

    mount_single_house(&server, &["aaaa-0001"]).await;
    platform.refresh_topology().await.unwrap();
    layer.take();

    let (raw, sender) = announcement("aaaa-0001", &server);
    assert!(platform.handle_datagram(&raw, sender));
    assert!(!platform.handle_datagram(&raw, sender));
    assert!(!platform.handle_datagram(b"garbage", sender));

    assert!(platform.registry().get(&id("aaaa-0001")).unwrap().reachable);
    assert_eq!(layer.take(), vec!["reachable aaaa-0001 true"]);
}

// ── Characteristic handlers ─────────────────────────────────────────

#[tokio::test]
async fn test_on_from_dark_goes_full_and_off_goes_zero() {
    let server = MockServer::start().await;
    let (platform, layer) = platform(&server);

    mount_single_house(&server, &["aaaa-0001"]).await;
    platform.refresh_topology().await.unwrap();
    let (raw, sender) = announcement("aaaa-0001", &server);
    platform.handle_datagram(&raw, sender);
    layer.take();

    Mock::given(method("POST"))
        .and(path("/v2/setLogicalLoadLevel"))
        .and(body_json(json!({ "level": 255, "llid": "l1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/setLogicalLoadLevel"))
        .and(body_json(json!({ "level": 0, "llid": "l1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let lpid = id("aaaa-0001");
    platform.set_on(&lpid, true).await.unwrap();
    // Already on: no second command.
    platform.set_on(&lpid, true).await.unwrap();
    platform.set_on(&lpid, false).await.unwrap();

    assert_eq!(
        layer.take(),
        vec![
            "characteristics aaaa-0001 true 100",
            "characteristics aaaa-0001 false 0"
        ]
    );
}

#[tokio::test]
async fn test_get_on_reads_device() {
    let server = MockServer::start().await;
    let (platform, _layer) = platform(&server);

    mount_single_house(&server, &["aaaa-0001"]).await;
    platform.refresh_topology().await.unwrap();
    let (raw, sender) = announcement("aaaa-0001", &server);
    platform.handle_datagram(&raw, sender);

    Mock::given(method("POST"))
        .and(path("/v2/getLogicalLoadMetrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "level": 26 })))
        .mount(&server)
        .await;

    let lpid = id("aaaa-0001");
    assert!(platform.get_on(&lpid).await.unwrap());
    assert_eq!(platform.get_brightness(&lpid).await.unwrap(), 10);
}

#[tokio::test]
async fn test_switch_off_reads_live_level_over_stale_cloud_level() {
    let server = MockServer::start().await;
    let (platform, _layer) = platform(&server);

    // The cloud reports the load dark; the lightpad is actually at full.
    mount_single_house(&server, &["aaaa-0001"]).await;
    platform.refresh_topology().await.unwrap();
    let (raw, sender) = announcement("aaaa-0001", &server);
    platform.handle_datagram(&raw, sender);

    Mock::given(method("POST"))
        .and(path("/v2/getLogicalLoadMetrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "level": 255 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/setLogicalLoadLevel"))
        .and(body_json(json!({ "level": 0, "llid": "l1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let lpid = id("aaaa-0001");
    assert_eq!(platform.switch(&lpid, false).await.unwrap(), 0);
    assert!(!platform.registry().characteristics(&lpid).unwrap().on);
}

#[tokio::test]
async fn test_switch_on_when_already_on_sends_nothing() {
    let server = MockServer::start().await;
    let (platform, _layer) = platform(&server);

    mount_single_house(&server, &["aaaa-0001"]).await;
    platform.refresh_topology().await.unwrap();
    let (raw, sender) = announcement("aaaa-0001", &server);
    platform.handle_datagram(&raw, sender);

    Mock::given(method("POST"))
        .and(path("/v2/getLogicalLoadMetrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "level": 128 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/setLogicalLoadLevel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(platform.switch(&id("aaaa-0001"), true).await.unwrap(), 50);
}

// ── Accessory ordering ──────────────────────────────────────────────

/// Checks the registry from inside `register`.
#[derive(Default)]
struct RegistryCheckingLayer {
    registry: OnceLock<Arc<DeviceRegistry>>,
    seen: Mutex<Vec<bool>>,
}

impl AccessoryLayer for RegistryCheckingLayer {
    fn register(&self, handle: &DeviceHandle) {
        let present = self
            .registry
            .get()
            .is_some_and(|r| r.contains(&handle.lpid));
        self.seen.lock().unwrap().push(present);
    }

    fn unregister(&self, _lpid: &LightpadId) {}

    fn update_reachability(&self, _lpid: &LightpadId, _reachable: bool) {}

    fn update_characteristics(&self, _lpid: &LightpadId, _characteristics: Characteristics) {}
}

#[tokio::test]
async fn test_register_sees_device_already_in_registry() {
    let server = MockServer::start().await;
    let layer = Arc::new(RegistryCheckingLayer::default());
    let platform = Platform::from_parts(
        PlatformConfig::default(),
        topology_client(&server),
        lightpad_client(),
        Arc::clone(&layer) as Arc<dyn AccessoryLayer>,
    );
    assert!(layer.registry.set(Arc::clone(platform.registry())).is_ok());

    mount_single_house(&server, &["aaaa-0001", "aaaa-0002"]).await;
    platform.refresh_topology().await.unwrap();

    assert_eq!(*layer.seen.lock().unwrap(), vec![true, true]);
}
