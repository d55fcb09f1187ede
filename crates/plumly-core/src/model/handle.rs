// ── Device handle ──
//
// The unit exposed to the accessory layer: one per lightpad id.

use serde::Serialize;

use super::level::device_to_percent;
use super::lightpad::LightpadId;
use super::topology::DeviceContext;

/// Cached accessory characteristic values, so reads can be answered
/// without asking the lightpad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Characteristics {
    pub on: bool,
    /// Percent, 0-100.
    pub brightness: u8,
}

impl Characteristics {
    /// Derive both characteristics from a percentage.
    pub fn from_percent(percent: u8) -> Self {
        Self {
            on: percent > 0,
            brightness: percent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceHandle {
    pub lpid: LightpadId,
    pub name: String,
    pub context: DeviceContext,
    pub reachable: bool,
    pub characteristics: Characteristics,
}

impl DeviceHandle {
    /// New unreachable handle. Characteristics are seeded from the cached
    /// load level when the cloud reported one.
    pub fn new(lpid: LightpadId, name: String, context: DeviceContext) -> Self {
        let characteristics = context
            .load
            .level
            .map(|level| Characteristics::from_percent(device_to_percent(level)))
            .unwrap_or_default();
        Self {
            lpid,
            name,
            context,
            reachable: false,
            characteristics,
        }
    }

    pub fn llid(&self) -> &str {
        &self.context.load.llid
    }
}
