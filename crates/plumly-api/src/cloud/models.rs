// Wire types for the Plum cloud API.
//
// Field names follow the cloud's JSON exactly. Unknown fields are ignored.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /v2/getHouse`.
#[derive(Debug, Serialize)]
pub struct HouseRequest<'a> {
    pub hid: &'a str,
}

/// Body of `POST /v2/getRoom`.
#[derive(Debug, Serialize)]
pub struct RoomRequest<'a> {
    pub rid: &'a str,
}

/// Body of `POST /v2/getLogicalLoad`.
#[derive(Debug, Serialize)]
pub struct LogicalLoadRequest<'a> {
    pub llid: &'a str,
}

/// Response of `POST /v2/getHouse`.
#[derive(Debug, Clone, Deserialize)]
pub struct HouseDetail {
    pub hid: String,
    #[serde(default)]
    pub house_name: Option<String>,
    /// Per-house secret. Only its digest ever leaves this process.
    #[serde(deserialize_with = "deserialize_secret")]
    pub house_access_token: SecretString,
    #[serde(default)]
    pub rids: Vec<String>,
}

/// Response of `POST /v2/getRoom`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomDetail {
    pub rid: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub llids: Vec<String>,
}

/// Response of `POST /v2/getLogicalLoad`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogicalLoadDetail {
    pub llid: String,
    #[serde(default)]
    pub logical_load_name: String,
    #[serde(default)]
    pub lpids: Vec<String>,
    /// Last level the cloud knows about (0-255); absent on some accounts.
    #[serde(default)]
    pub level: Option<u8>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
