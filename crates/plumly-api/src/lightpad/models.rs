use serde::{Deserialize, Serialize};

/// Body of `POST /v2/setLogicalLoadLevel`.
#[derive(Debug, Serialize)]
pub struct SetLevelRequest<'a> {
    pub level: u8,
    pub llid: &'a str,
}

/// Body of `POST /v2/getLogicalLoadMetrics`.
#[derive(Debug, Serialize)]
pub struct MetricsRequest<'a> {
    pub llid: &'a str,
}

/// Response of `POST /v2/getLogicalLoadMetrics`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LogicalLoadMetrics {
    #[serde(default)]
    pub llid: Option<String>,
    /// On-device level, 0-255.
    pub level: u8,
    /// Instantaneous power draw in watts, when the lightpad reports it.
    #[serde(default)]
    pub power: Option<f64>,
}
