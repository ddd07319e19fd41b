//! Common test infrastructure for runstage-fetch tests

#![allow(dead_code)]

use runstage_core::types::NetworkConfig;
use runstage_fetch::HttpFetcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ARCHIVE_BYTES: &[u8] = b"PK\x03\x04 fake archive body";

/// Fetcher with progress output disabled
pub fn quiet_fetcher() -> HttpFetcher {
    HttpFetcher::new(&NetworkConfig::default())
        .unwrap()
        .with_progress(false)
}

/// Serve `content` at `route` with status 200
pub async fn mock_resource(server: &MockServer, route: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .expect(1)
        .mount(server)
        .await;
}

/// Answer `route` with the given error status
pub async fn mock_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
