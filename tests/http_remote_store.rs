//! `HttpRemoteStore` against a `wiremock` server, plus the store-level
//! degraded-mode scenario over real HTTP failures.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use preset_store::config::RemoteConfig;
use preset_store::{
  CacheSource, HttpRemoteStore, LocalMirror, MemoryKv, Parameters, PresetDraft, PresetError,
  PresetStore, RemoteError, RemoteStore, StaticSecret, TimestampOrigin,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn remote_for(uri: &str, api_key: Option<&str>) -> HttpRemoteStore {
  HttpRemoteStore::new(&RemoteConfig {
    url: uri.to_string(),
    api_key: api_key.map(String::from),
    timeout_secs: 5,
    list_limit: 100,
  })
  .expect("valid remote config")
}

fn warm_pad() -> Parameters {
  match json!({"cutoff": 800, "resonance": 0.2}) {
    serde_json::Value::Object(map) => map,
    _ => unreachable!(),
  }
}

fn doc(id: &str, name: &str, created_at: &str) -> serde_json::Value {
  json!({
    "id": id,
    "name": name,
    "description": "",
    "parameters": {"cutoff": 800},
    "author": "YS Studio",
    "createdAt": created_at,
    "toolVersion": "1.0.0"
  })
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_sends_document_and_returns_server_time() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .and(path("/presets/synth-x/items/preset_1"))
    .and(header("authorization", "Bearer secret-key"))
    .and(body_json(json!({
      "name": "Warm Pad",
      "description": "soft",
      "parameters": {"cutoff": 800, "resonance": 0.2},
      "author": "YS Studio",
      "toolVersion": "1.0.0"
    })))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(doc("preset_1", "Warm Pad", "2025-03-01T10:00:00Z")),
    )
    .expect(1)
    .mount(&server)
    .await;

  let remote = remote_for(&server.uri(), Some("secret-key"));
  let draft = PresetDraft {
    name: "Warm Pad".into(),
    description: "soft".into(),
    parameters: warm_pad(),
    author: "YS Studio".into(),
    tool_version: "1.0.0".into(),
  };

  let created_at = remote.create("synth-x", "preset_1", &draft).await.unwrap();
  assert_eq!(created_at.to_rfc3339(), "2025-03-01T10:00:00+00:00");
}

#[tokio::test]
async fn test_get_by_id() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/presets/synth-x/items/preset_1"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(doc("preset_1", "Warm Pad", "2025-03-01T10:00:00Z")),
    )
    .mount(&server)
    .await;

  let preset = remote_for(&server.uri(), None)
    .get_by_id("synth-x", "preset_1")
    .await
    .unwrap();

  assert_eq!(preset.name, "Warm Pad");
  assert_eq!(preset.namespace, "synth-x");
  assert_eq!(preset.created_at.origin, TimestampOrigin::ServerAssigned);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  let err = remote_for(&server.uri(), None)
    .get_by_id("synth-x", "nope")
    .await
    .unwrap_err();

  assert_eq!(err, RemoteError::NotFound);
}

#[tokio::test]
async fn test_list_recent_queries_and_orders() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/presets/synth-x/items"))
    .and(query_param("orderBy", "createdAt"))
    .and(query_param("direction", "desc"))
    .and(query_param("limit", "2"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "documents": [
        doc("old", "Old", "2025-01-01T00:00:00Z"),
        doc("new", "New", "2025-03-01T00:00:00Z"),
        doc("mid", "Mid", "2025-02-01T00:00:00Z"),
      ]
    })))
    .mount(&server)
    .await;

  let presets = remote_for(&server.uri(), None)
    .list_recent("synth-x", 2)
    .await
    .unwrap();

  let ids: Vec<&str> = presets.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, vec!["new", "mid"]);
}

#[tokio::test]
async fn test_delete_absent_document_succeeds() {
  let server = MockServer::start().await;
  Mock::given(method("DELETE"))
    .and(path("/presets/synth-x/items/gone"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  remote_for(&server.uri(), None)
    .delete("synth-x", "gone")
    .await
    .unwrap();
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
  let server = MockServer::start().await;
  Mock::given(method("DELETE"))
    .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
    .mount(&server)
    .await;

  let err = remote_for(&server.uri(), None)
    .delete("synth-x", "preset_1")
    .await
    .unwrap_err();

  match err {
    RemoteError::Unavailable(msg) => assert!(msg.contains("503") && msg.contains("maintenance")),
    other => panic!("expected Unavailable, got {:?}", other),
  }
}

#[tokio::test]
async fn test_server_error_reports_as_remote_unavailable() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
    .mount(&server)
    .await;

  let err = remote_for(&server.uri(), None)
    .get_by_id("synth-x", "preset_1")
    .await
    .unwrap_err()
    .into_preset_error("synth-x", "preset_1");

  match err {
    PresetError::RemoteUnavailable(msg) => assert!(msg.contains("maintenance")),
    other => panic!("expected RemoteUnavailable, got {:?}", other),
  }
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
  // Grab a free port and release it so nothing is listening there
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let uri = format!("http://{}", listener.local_addr().unwrap());
  drop(listener);

  let err = remote_for(&uri, None)
    .list_recent("synth-x", 10)
    .await
    .unwrap_err();

  assert!(matches!(err, RemoteError::Unavailable(_)));
}

// ---------------------------------------------------------------------------
// Store over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_degraded_save_then_list_from_local_mirror() {
  let server = MockServer::start().await;
  Mock::given(path_regex("^/presets/"))
    .respond_with(ResponseTemplate::new(503))
    .mount(&server)
    .await;

  let store = PresetStore::builder(
    Arc::new(remote_for(&server.uri(), None)),
    LocalMirror::new(Arc::new(MemoryKv::new())),
    Arc::new(StaticSecret::new("yambostudio")),
  )
  .build();

  let saved = store
    .save("synth-x", "Warm Pad", "", warm_pad(), "yambostudio")
    .await
    .expect("save succeeds in degraded mode");
  assert!(saved.is_degraded_write());

  let listed = store.list_sourced("synth-x", false).await;
  assert_eq!(listed.source, CacheSource::LocalFallback);
  assert_eq!(listed.data.len(), 1);
  assert_eq!(listed.data[0].name, "Warm Pad");
  assert_eq!(listed.data[0].parameters, warm_pad());
}

#[tokio::test]
async fn test_saved_preset_loads_back_over_http() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(doc("ignored", "Warm Pad", "2025-03-01T10:00:00Z")),
    )
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  let store = PresetStore::builder(
    Arc::new(remote_for(&server.uri(), None)),
    LocalMirror::new(Arc::new(MemoryKv::new())),
    Arc::new(StaticSecret::new("yambostudio")),
  )
  .build();

  let saved = store
    .save("synth-x", "Warm Pad", "", warm_pad(), "yambostudio")
    .await
    .unwrap();
  assert_eq!(saved.created_at.origin, TimestampOrigin::ServerAssigned);

  let loaded = store.load_by_id_sourced("synth-x", &saved.id).await.unwrap();
  assert_eq!(loaded.source, CacheSource::LocalFallback);
  assert_eq!(loaded.data.parameters, warm_pad());
}
