//! Device layer between `plumly-api` and a host home-automation bridge.
//!
//! This crate owns discovery bookkeeping, the cloud topology, and lightpad
//! control for one Plum account:
//!
//! - **[`Platform`]** — Orchestrator. [`start()`](Platform::start) broadcasts
//!   a discovery request, spawns the listener, fetches the cloud topology and
//!   reconciles it into the registry. Also exposes the on/brightness handlers
//!   a host wires to its accessory characteristics.
//!
//! - **[`AddressResolver`]** — Live lightpad id to address table, fed by UDP
//!   discovery responses. A lightpad without a record is unreachable.
//!
//! - **[`TopologyClient`]** — Concurrent traversal of houses, rooms and
//!   logical loads, flattened into a [`Topology`] keyed by lightpad id.
//!
//! - **[`reconcile()`]** — Pure diff of a topology against existing handles.
//!
//! - **[`DeviceRegistry`]** — `DashMap` + `watch` store of [`DeviceHandle`]s
//!   with a broadcast channel of [`RegistryEvent`]s.
//!
//! - **[`DeviceController`]** — Percent-based level commands over the
//!   lightpad local HTTPS API.
//!
//! - **[`AccessoryLayer`]** — Hooks the host implements to mirror handles.

pub mod accessory;
pub mod address;
pub mod cloud;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod platform;
pub mod reconcile;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessory::{AccessoryLayer, LoggingAccessoryLayer, NoopAccessoryLayer};
pub use address::{AddressResolver, ReachabilityEvent};
pub use cloud::TopologyClient;
pub use config::{PlatformConfig, TlsVerification};
pub use controller::DeviceController;
pub use error::{CloudError, CommandError, CommandErrorKind, CoreError};
pub use platform::{Platform, ReconcileSummary};
pub use reconcile::{HandleAddition, ReconcilePlan, reconcile};
pub use store::{DeviceRegistry, HandleStream, RegistryEvent};

pub use plumly_api::{DEFAULT_CLOUD_URL, DISCOVERY_PORT};

pub use model::{
    AddressRecord, Characteristics, DeviceContext, DeviceHandle, House, HouseTree, LightpadId,
    LogicalLoad, MAX_PERCENT, Room, RoomTree, Topology, device_to_percent, percent_to_device,
};
