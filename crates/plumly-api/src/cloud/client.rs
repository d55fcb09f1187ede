// Plum cloud HTTP client
//
// Wraps `reqwest::Client` with Basic auth, URL construction and response
// decoding for the four topology endpoints. The traversal across them lives
// in plumly-core; this module only knows single requests.

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::CloudCredentials;
use crate::cloud::models::{
    HouseDetail, HouseRequest, LogicalLoadDetail, LogicalLoadRequest, RoomDetail, RoomRequest,
};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Production cloud endpoint.
pub const DEFAULT_CLOUD_URL: &str = "https://production.plum.technology";

/// Raw HTTP client for the Plum cloud API.
///
/// Every request carries the same static Basic credentials. Responses are
/// plain JSON (no envelope); non-2xx statuses become [`Error`] variants.
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: CloudCredentials,
}

impl CloudClient {
    /// Create a cloud client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        credentials: CloudCredentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a cloud client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: CloudCredentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /v2/getHouses` -- ids of every house on the account.
    pub async fn get_houses(&self) -> Result<Vec<String>, Error> {
        let url = self.api_url("getHouses")?;
        debug!("GET {}", url);
        let builder = self.http.get(url);
        self.send(builder).await
    }

    /// `POST /v2/getHouse` -- room ids and the house access token.
    pub async fn get_house(&self, hid: &str) -> Result<HouseDetail, Error> {
        self.post("getHouse", &HouseRequest { hid }).await
    }

    /// `POST /v2/getRoom` -- room name and logical load ids.
    pub async fn get_room(&self, rid: &str) -> Result<RoomDetail, Error> {
        self.post("getRoom", &RoomRequest { rid }).await
    }

    /// `POST /v2/getLogicalLoad` -- load name, member lightpads and level.
    pub async fn get_logical_load(&self, llid: &str) -> Result<LogicalLoadDetail, Error> {
        self.post("getLogicalLoad", &LogicalLoadRequest { llid })
            .await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build `{base}/v2/{endpoint}`.
    fn api_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/v2/{endpoint}"))?)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(endpoint)?;
        debug!("POST {}", url);
        let builder = self.http.post(url).json(body);
        self.send(builder).await
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T, Error> {
        let resp = builder
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("cloud rejected credentials (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        trace!(body = %preview(&body), "cloud response");
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
