/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for hapi-client tests

#![allow(dead_code)]

use hapi_client::{Client, ClientConfig, Credentials};
use wiremock::MockServer;

/// Path the mock hAPI endpoint is mounted under
pub const API_PATH: &str = "/version/1.0";

pub const TEST_KEY: &str = "TESTKEY";
pub const TEST_SECRET: &str = "TESTSECRET";

/// Two-device listing used by the label lookup tests
pub const DEVICE_LISTING: &str = r#"<?xml version="1.0"?>
<rsp stat="ok">
  <devices>
    <device id="1" label="web1.example.com">
      <type id="3">Virtual Server</type>
      <model id="7">VoxCLOUD</model>
    </device>
    <device id="2" label="web2">
      <type id="1">Dedicated Server</type>
      <model id="9">Dell R410</model>
    </device>
  </devices>
</rsp>"#;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Config pointing both endpoints at the mock server
pub fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        endpoint: format!("{}{API_PATH}", server.uri()),
        auth_endpoint: Some(format!("{}/auth", server.uri())),
        ..ClientConfig::default()
    }
}

/// Client with test credentials against the mock server
pub fn signed_client(server: &MockServer) -> Client {
    Client::with_credentials(mock_config(server), Credentials::new(TEST_KEY, TEST_SECRET))
        .expect("client init")
}

/// Wrap a payload in an ok envelope
pub fn ok_envelope(inner: &str) -> String {
    format!(r#"<rsp stat="ok">{inner}</rsp>"#)
}
