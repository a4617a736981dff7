/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for signed calls, decoding and lookups
[POS]:    Integration tests - HTTP dispatch
[UPDATE]: When dispatch, decoding or lookup behavior changes
*/

mod common;

use std::collections::BTreeMap;
use std::io::Write;

use common::{
    API_PATH, DEVICE_LISTING, TEST_KEY, TEST_SECRET, mock_config, ok_envelope, setup_mock_server,
    signed_client,
};
use flate2::Compression;
use flate2::write::GzEncoder;
use hapi_client::{Client, ClientConfig, Credentials, HapiError, Reply, RequestSigner};
use rstest::rstest;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn xml_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/xml")
}

#[test]
fn test_client_creation() {
    let client = assert_ok!(Client::new());
    assert!(client.credentials().is_none());
    assert!(client.last_headers().is_none());
}

#[test]
fn test_client_credentials_roundtrip() {
    let mut client = assert_ok!(Client::with_config(ClientConfig::default()));
    client.set_credentials(Credentials::new(TEST_KEY, TEST_SECRET));

    let stored = client.credentials().expect("credentials should be set");
    assert_eq!(stored.key, TEST_KEY);
    assert_eq!(stored.secret, TEST_SECRET);
}

#[tokio::test]
async fn test_signed_call_query() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "voxel.voxcloud.status"))
        .and(query_param("device_id", "12542"))
        .and(query_param("key", TEST_KEY))
        .respond_with(xml_response(&ok_envelope(
            "<devices><device id=\"12542\"><status>QUEUED</status></device></devices>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_client(&server);
    let result = client
        .method("voxel.voxcloud")
        .segment("status")
        .param("device_id", 12542)
        .send_tree()
        .await
        .expect("status call failed");

    assert_eq!(result["devices"]["device"]["status"], "QUEUED");

    let requests = server.received_requests().await.expect("recorded requests");
    let query: BTreeMap<String, String> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    assert!(query["timestamp"].ends_with("+0000"));
    let mut unsigned = query.clone();
    let api_sig = unsigned.remove("api_sig").expect("api_sig present");
    assert_eq!(api_sig, RequestSigner::new(TEST_SECRET).sign(&unsigned));

    let user_agent = requests[0]
        .headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .expect("user agent");
    assert!(user_agent.starts_with("hapi-client/"));
    assert_eq!(
        requests[0]
            .headers
            .get("accept-encoding")
            .and_then(|value| value.to_str().ok()),
        Some("gzip,deflate")
    );
}

#[tokio::test]
async fn test_compression_disabled_omits_accept_encoding() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_response(&ok_envelope("")))
        .mount(&server)
        .await;

    let config = ClientConfig {
        compression: false,
        ..mock_config(&server)
    };
    let client = Client::with_credentials(config, Credentials::new(TEST_KEY, TEST_SECRET))
        .expect("client init");
    assert_ok!(client.method("voxel.devices.list").send().await);

    let requests = server.received_requests().await.expect("recorded requests");
    assert!(requests[0].headers.get("accept-encoding").is_none());
}

#[tokio::test]
async fn test_gzip_response_is_inflated() {
    let server = setup_mock_server().await;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(DEVICE_LISTING.as_bytes())
        .expect("compress");
    let compressed = encoder.finish().expect("compress");

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_raw(compressed, "text/xml"),
        )
        .mount(&server)
        .await;

    let client = signed_client(&server);
    let reply = client
        .method("voxel.devices.list")
        .send()
        .await
        .expect("list failed");

    let tree = reply.as_tree().expect("decoded tree");
    assert_eq!(tree["devices"]["device"][1]["label"], "web2");

    let headers = client.last_headers().expect("headers recorded");
    assert_eq!(
        headers.get("content-encoding").and_then(|v| v.to_str().ok()),
        Some("gzip")
    );
}

#[tokio::test]
async fn test_remote_failure() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_response(
            r#"<rsp stat="fail"><err code="4" msg="bad key"/></rsp>"#,
        ))
        .mount(&server)
        .await;

    let client = signed_client(&server);
    let err = client
        .method("voxel.devices.list")
        .send()
        .await
        .unwrap_err();

    match err {
        HapiError::Remote { code, message } => {
            assert_eq!(code, "4");
            assert_eq!(message, "bad key");
        }
        other => panic!("Expected Remote error, got {other:?}"),
    }
}

#[rstest]
#[case(r#"<rsp stat="pending"/>"#)]
#[case(r#"<rsp/>"#)]
#[tokio::test]
async fn test_protocol_failure(#[case] body: &str) {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_response(body))
        .mount(&server)
        .await;

    let client = signed_client(&server);
    match client.method("voxel.devices.list").send().await {
        Err(HapiError::Protocol { body: raw }) => assert_eq!(raw, body),
        other => panic!("Expected Protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_raw_output_skips_status_check() {
    let server = setup_mock_server().await;
    let body = r#"<rsp stat="fail"><err code="4" msg="bad key"/></rsp>"#;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_response(body))
        .mount(&server)
        .await;

    let config = ClientConfig {
        raw_output: true,
        ..mock_config(&server)
    };
    let client = Client::with_credentials(config, Credentials::new(TEST_KEY, TEST_SECRET))
        .expect("client init");

    let reply = client
        .method("voxel.devices.list")
        .send()
        .await
        .expect("raw call");
    assert_eq!(reply, Reply::Raw(body.to_string()));
}

#[tokio::test]
async fn test_http_error_status_propagates() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = signed_client(&server);
    let err = client
        .method("voxel.devices.list")
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, HapiError::Http(_)));
}

#[rstest]
#[case("web1", "1")]
#[case("web1.example.com", "1")]
#[case("web2", "2")]
#[tokio::test]
async fn test_id_from_label(#[case] label: &str, #[case] expected: &str) {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("method", "voxel.devices.list"))
        .respond_with(xml_response(DEVICE_LISTING))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_client(&server);
    let id = client.id_from_label(label).await.expect("label lookup");
    assert_eq!(id, expected);
}

#[tokio::test]
async fn test_id_from_label_missing() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_response(DEVICE_LISTING))
        .mount(&server)
        .await;

    let client = signed_client(&server);
    match client.id_from_label("missing").await {
        Err(HapiError::LabelNotFound { label }) => assert_eq!(label, "missing"),
        other => panic!("Expected LabelNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_id_from_label_ignores_raw_output() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(xml_response(DEVICE_LISTING))
        .mount(&server)
        .await;

    let config = ClientConfig {
        raw_output: true,
        ..mock_config(&server)
    };
    let client = Client::with_credentials(config, Credentials::new(TEST_KEY, TEST_SECRET))
        .expect("client init");
    assert_eq!(client.id_from_label("web2").await.expect("lookup"), "2");
}
