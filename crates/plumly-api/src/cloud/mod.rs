// Plum cloud API: account topology (houses, rooms, logical loads).

mod client;
pub mod models;

pub use client::{CloudClient, DEFAULT_CLOUD_URL};
pub use models::{HouseDetail, LogicalLoadDetail, RoomDetail};
