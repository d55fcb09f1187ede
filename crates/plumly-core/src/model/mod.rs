// ── Domain model ──
//
// Canonical types for houses, rooms, loads, lightpads and handles.
// API wire types are converted into these in `convert`.

mod handle;
mod level;
mod lightpad;
mod topology;

pub use handle::{Characteristics, DeviceHandle};
pub use level::{MAX_PERCENT, device_to_percent, percent_to_device};
pub use lightpad::{AddressRecord, LightpadId};
pub use topology::{DeviceContext, House, HouseTree, LogicalLoad, Room, RoomTree, Topology};

#[cfg(test)]
pub(crate) use topology::tests as fixtures;
