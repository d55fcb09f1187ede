// plumly-api: Async Rust client for the Plum cloud, lightpad local API, and discovery.

pub mod auth;
pub mod cloud;
pub mod discovery;
pub mod error;
pub mod lightpad;
pub mod transport;

pub use auth::{CloudCredentials, HOUSE_TOKEN_HEADER, house_token_digest};
pub use cloud::{CloudClient, DEFAULT_CLOUD_URL, HouseDetail, LogicalLoadDetail, RoomDetail};
pub use discovery::{
    Announcement, DEFAULT_STREAM_PORT, DISCOVERY_PAYLOAD, DISCOVERY_PORT, DiscoveryParseError,
    DiscoverySocket, parse_announcement,
};
pub use error::Error;
pub use lightpad::{LightpadClient, LightpadEndpoint, LogicalLoadMetrics};
pub use transport::{TlsMode, TransportConfig, USER_AGENT};
