// Lightpad local API: level control over HTTPS on the LAN.

mod client;
pub mod models;

pub use client::{LightpadClient, LightpadEndpoint};
pub use models::LogicalLoadMetrics;
