// Lightpad local HTTP client
//
// Every request goes straight to one lightpad at the address discovery
// found for it. The house token header is computed per request from the
// house secret and never cached.

use std::net::{IpAddr, SocketAddr};

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, trace};

use crate::auth::{HOUSE_TOKEN_HEADER, house_token_digest};
use crate::error::Error;
use crate::lightpad::models::{LogicalLoadMetrics, MetricsRequest, SetLevelRequest};
use crate::transport::TransportConfig;

const SET_LEVEL_PATH: &str = "/v2/setLogicalLoadLevel";
const METRICS_PATH: &str = "/v2/getLogicalLoadMetrics";

/// Where a lightpad accepts commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightpadEndpoint {
    pub address: IpAddr,
    pub port: u16,
}

impl LightpadEndpoint {
    pub fn new(address: IpAddr, port: u16) -> Self {
        Self { address, port }
    }

    fn socket_addr(self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

/// HTTP client for the lightpad local API.
///
/// One client serves every lightpad; the target endpoint and house token are
/// per-call arguments.
pub struct LightpadClient {
    http: reqwest::Client,
    scheme: &'static str,
}

impl LightpadClient {
    /// Create a client from a `TransportConfig` (normally [`TransportConfig::lightpad`]).
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            scheme: "https",
        }
    }

    /// Talk plain HTTP instead of HTTPS. Only useful against test servers.
    pub fn with_plain_http(mut self) -> Self {
        self.scheme = "http";
        self
    }

    /// `POST /v2/setLogicalLoadLevel` with a device-scale level.
    pub async fn set_logical_load_level(
        &self,
        endpoint: LightpadEndpoint,
        house_token: &SecretString,
        llid: &str,
        level: u8,
    ) -> Result<(), Error> {
        self.post(endpoint, SET_LEVEL_PATH, house_token, &SetLevelRequest { level, llid })
            .await
            .map(drop)
    }

    /// `POST /v2/getLogicalLoadMetrics` -- current device-scale level.
    pub async fn get_logical_load_metrics(
        &self,
        endpoint: LightpadEndpoint,
        house_token: &SecretString,
        llid: &str,
    ) -> Result<LogicalLoadMetrics, Error> {
        let body = self
            .post(endpoint, METRICS_PATH, house_token, &MetricsRequest { llid })
            .await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body: {body:?})"),
            body: body.clone(),
        })
    }

    async fn post(
        &self,
        endpoint: LightpadEndpoint,
        path: &str,
        house_token: &SecretString,
        body: &(impl Serialize + Sync),
    ) -> Result<String, Error> {
        let url = format!("{}://{}{path}", self.scheme, endpoint.socket_addr());
        debug!("POST {}", url);

        let resp = self
            .http
            .post(&url)
            .header(HOUSE_TOKEN_HEADER, house_token_digest(house_token))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;
        trace!(%status, body = %text, "lightpad response");

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("lightpad rejected house token (HTTP {status})"),
            });
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }
}
