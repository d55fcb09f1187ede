// ── Reactive device store ──
//
// Lock-free handle storage with push-based change notification.

mod registry;
mod stream;

pub use registry::{DeviceRegistry, RegistryEvent};
pub use stream::HandleStream;
