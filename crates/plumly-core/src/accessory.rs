// ── Accessory layer seam ──
//
// The host home-automation bridge plugs in here. The platform calls these
// hooks as handles come and go and as their state changes; it never waits
// on the host for anything.

use tracing::info;

use crate::model::{Characteristics, DeviceHandle, LightpadId};

/// Host-side sink for device lifecycle and state changes.
///
/// Implementations must be cheap and non-blocking: hooks run inline on the
/// platform's tasks.
pub trait AccessoryLayer: Send + Sync {
    /// A new handle entered the registry.
    fn register(&self, handle: &DeviceHandle);

    /// A handle left the registry (its lightpad vanished from the cloud).
    fn unregister(&self, lpid: &LightpadId);

    /// The reachability flag of a handle flipped.
    fn update_reachability(&self, lpid: &LightpadId, reachable: bool);

    /// Fresh on/brightness values after a command or a read.
    fn update_characteristics(&self, lpid: &LightpadId, characteristics: Characteristics);
}

/// Accepts every hook and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAccessoryLayer;

impl AccessoryLayer for NoopAccessoryLayer {
    fn register(&self, _handle: &DeviceHandle) {}
    fn unregister(&self, _lpid: &LightpadId) {}
    fn update_reachability(&self, _lpid: &LightpadId, _reachable: bool) {}
    fn update_characteristics(&self, _lpid: &LightpadId, _characteristics: Characteristics) {}
}

/// Reports every hook through `tracing`. Used by the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAccessoryLayer;

impl AccessoryLayer for LoggingAccessoryLayer {
    fn register(&self, handle: &DeviceHandle) {
        info!(lpid = %handle.lpid, name = %handle.name, "accessory registered");
    }

    fn unregister(&self, lpid: &LightpadId) {
        info!(%lpid, "accessory unregistered");
    }

    fn update_reachability(&self, lpid: &LightpadId, reachable: bool) {
        info!(%lpid, reachable, "accessory reachability changed");
    }

    fn update_characteristics(&self, lpid: &LightpadId, characteristics: Characteristics) {
        info!(
            %lpid,
            on = characteristics.on,
            brightness = characteristics.brightness,
            "accessory characteristics updated"
        );
    }
}
