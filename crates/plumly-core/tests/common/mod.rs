// Shared wiremock fixtures for plumly-core integration tests.
#![allow(clippy::unwrap_used, dead_code)]

use std::net::SocketAddr;

use plumly_api::{CloudClient, CloudCredentials, LightpadClient, TransportConfig};
use plumly_core::TopologyClient;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HOUSE_TOKEN: &str = "house-secret";

pub fn topology_client(server: &MockServer) -> TopologyClient {
    let credentials = CloudCredentials::new("user@example.com", SecretString::from("pw".to_string()));
    let cloud = CloudClient::new(
        Url::parse(&server.uri()).unwrap(),
        credentials,
        &TransportConfig::cloud(),
    )
    .unwrap();
    TopologyClient::from_client(cloud)
}

pub fn lightpad_client() -> LightpadClient {
    LightpadClient::new(&TransportConfig::lightpad())
        .unwrap()
        .with_plain_http()
}

/// Mount one house `h1` with room `r1` ("Kitchen") holding load `l1`
/// ("Island") at device level 0, listing `lpids`.
pub async fn mount_single_house(server: &MockServer, lpids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/v2/getHouses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["h1"])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/getHouse"))
        .and(body_json(json!({ "hid": "h1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hid": "h1",
            "house_name": "Home",
            "house_access_token": HOUSE_TOKEN,
            "rids": ["r1"],
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/getRoom"))
        .and(body_json(json!({ "rid": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rid": "r1",
            "room_name": "Kitchen",
            "llids": ["l1"],
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/getLogicalLoad"))
        .and(body_json(json!({ "llid": "l1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "llid": "l1",
            "logical_load_name": "Island",
            "lpids": lpids,
            "level": 0,
        })))
        .mount(server)
        .await;
}

/// A discovery answer for `lpid`, as sent by a lightpad listening on the
/// mock server's port.
pub fn announcement(lpid: &str, server: &MockServer) -> (Vec<u8>, SocketAddr) {
    let addr = *server.address();
    let raw = format!("PLUM 8888 {lpid} {}", addr.port()).into_bytes();
    (raw, SocketAddr::new(addr.ip(), 43770))
}
