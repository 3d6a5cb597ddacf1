//! REST client tests against a local warp mock of the Keybrame API
//!
//! The mock records every request (method, raw path, content type, body) and
//! answers from a fixed route table, so each test checks the exact bytes the
//! client put on the wire.

use keybrame_console::api::{Backend, KeybrameClient};
use keybrame_console::errors::ConsoleError;
use keybrame_console::models::*;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use warp::Filter;
use warp::http::{Method, Response, StatusCode};
use warp::hyper::body::Bytes;
use warp::path::FullPath;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: Method,
    path: String,
    content_type: Option<String>,
    body: Bytes,
}

impl RecordedRequest {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

fn reply(status: StatusCode, body: Value) -> Response<String> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body.to_string())
        .unwrap()
}

fn route(request: &RecordedRequest, images: &Mutex<Vec<Value>>) -> Response<String> {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/api/version") => reply(StatusCode::OK, json!({ "version": "2.1.0" })),
        ("GET", "/api/settings") => reply(
            StatusCode::OK,
            json!({ "port": 5000, "default_image": "assets/idle.png" }),
        ),
        ("PUT", "/api/settings") => reply(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Invalid settings",
                "details": ["port must be a number", "default_image is missing"],
            }),
        ),
        ("GET", "/api/keybindings") => reply(
            StatusCode::OK,
            json!([{
                "id": 1,
                "keys": ["ctrl", "f1"],
                "type": "hold",
                "image": "assets/brb.png",
                "transition_in": { "image": "assets/in.gif", "duration": 800 },
                "transition_out": null,
                "priority": 0,
                "enabled": true,
            }]),
        ),
        ("POST", "/api/keybindings") => reply(StatusCode::OK, json!({ "success": true, "id": 12 })),
        ("PUT", "/api/keybindings/reorder") => reply(StatusCode::OK, json!({ "success": true })),
        ("DELETE", "/api/keybindings/404") => reply(
            StatusCode::NOT_FOUND,
            json!({ "error": "Keybinding not found" }),
        ),
        ("GET", "/api/images") => reply(StatusCode::OK, Value::Array(images.lock().unwrap().clone())),
        ("POST", "/api/images/upload") => {
            let entry = json!({ "filename": "bg.png", "path": "assets/bg.png", "size": 4 });
            images.lock().unwrap().push(entry.clone());
            reply(StatusCode::OK, entry)
        }
        ("DELETE", path) if path.starts_with("/api/images/") => {
            reply(StatusCode::OK, json!({ "success": true }))
        }
        ("POST", "/api/reload") => reply(StatusCode::OK, json!({ "success": true })),
        ("GET", "/api/export") => Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body("Internal Server Error".to_string())
            .unwrap(),
        _ => reply(StatusCode::NOT_FOUND, json!({ "error": "no route" })),
    }
}

/// Start the mock on an ephemeral port
fn start_mock() -> (SocketAddr, RequestLog) {
    let log: RequestLog = Arc::default();
    let images: Arc<Mutex<Vec<Value>>> = Arc::default();

    let filter_log = log.clone();
    let routes = warp::method()
        .and(warp::path::full())
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::bytes())
        .and_then(
            move |method: Method, path: FullPath, content_type: Option<String>, body: Bytes| {
                let log = filter_log.clone();
                let images = images.clone();
                async move {
                    let request = RecordedRequest {
                        method,
                        path: path.as_str().to_string(),
                        content_type,
                        body,
                    };
                    let response = route(&request, &images);
                    log.lock().unwrap().push(request);
                    Ok::<_, Infallible>(response)
                }
            },
        );

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, log)
}

fn client(addr: SocketAddr) -> KeybrameClient {
    KeybrameClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

fn last_request(log: &RequestLog) -> RecordedRequest {
    log.lock().unwrap().last().cloned().expect("no request recorded")
}

#[tokio::test]
async fn test_create_sends_null_for_disabled_transitions() {
    let (addr, log) = start_mock();
    let payload = KeybindingPayload {
        keys: vec!["ctrl".into(), "space".into()],
        binding_type: BindingType::Toggle,
        image: "assets/bg.png".into(),
        description: String::new(),
        transition_in: Some(None),
        transition_out: Some(None),
    };

    let created = client(addr).create_keybinding(&payload).await.unwrap();
    assert_eq!(created.id, Some(12));

    let request = last_request(&log);
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/keybindings");
    assert_eq!(
        request.json(),
        json!({
            "keys": ["ctrl", "space"],
            "type": "toggle",
            "image": "assets/bg.png",
            "description": "",
            "transition_in": null,
            "transition_out": null,
        })
    );
}

#[tokio::test]
async fn test_keybindings_decode_with_transitions() {
    let (addr, _log) = start_mock();
    let keybindings = client(addr).keybindings().await.unwrap();
    assert_eq!(keybindings.len(), 1);
    let kb = &keybindings[0];
    assert_eq!(kb.binding_type, BindingType::Hold);
    assert_eq!(kb.transition_in.as_ref().unwrap().duration, Some(800));
    assert!(kb.transition_out.is_none());
    assert_eq!(kb.description_text(), "");
}

#[tokio::test]
async fn test_upload_then_list_images() {
    let (addr, log) = start_mock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bg.png");
    std::fs::write(&path, [0x89u8, b'P', b'N', b'G']).unwrap();

    let client = client(addr);
    assert!(client.images().await.unwrap().is_empty());

    let file = UploadFile::from_path(&path).await.unwrap();
    let uploaded = client.upload_image(file).await.unwrap();
    assert_eq!(uploaded.path, "assets/bg.png");

    let request = last_request(&log);
    assert!(
        request
            .content_type
            .as_deref()
            .unwrap_or_default()
            .starts_with("multipart/form-data")
    );
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"bg.png\""));
    assert!(body.contains("content-type: image/png") || body.contains("Content-Type: image/png"));

    let images = client.images().await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].display_name(), "bg.png");
}

#[tokio::test]
async fn test_reorder_body() {
    let (addr, log) = start_mock();
    client(addr).reorder_keybindings(&[3, 1, 2]).await.unwrap();

    let request = last_request(&log);
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/api/keybindings/reorder");
    assert_eq!(request.json(), json!({ "order": [3, 1, 2] }));
}

#[tokio::test]
async fn test_error_details_are_joined() {
    let (addr, _log) = start_mock();
    let update = SettingsUpdate {
        port: 5000,
        default_image: String::new(),
    };
    let err = client(addr).update_settings(&update).await.unwrap_err();
    match &err {
        ConsoleError::Api { status, .. } => assert_eq!(*status, 400),
        other => panic!("expected API error, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "port must be a number, default_image is missing"
    );
}

#[tokio::test]
async fn test_error_without_details_uses_error_field() {
    let (addr, _log) = start_mock();
    let err = client(addr).delete_keybinding(404).await.unwrap_err();
    assert_eq!(err.to_string(), "Keybinding not found");
}

#[tokio::test]
async fn test_non_json_error_falls_back_to_status() {
    let (addr, _log) = start_mock();
    let err = client(addr).export_config().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500");
}

#[tokio::test]
async fn test_image_delete_is_url_encoded() {
    let (addr, log) = start_mock();
    client(addr).delete_image("my scene#1.png").await.unwrap();

    let request = last_request(&log);
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/api/images/my%20scene%231.png");
}

#[tokio::test]
async fn test_settings_and_version() {
    let (addr, log) = start_mock();
    let client = client(addr);
    let settings = client.settings().await.unwrap();
    assert_eq!(settings.port_or_default(), 5000);
    assert_eq!(settings.default_image, "assets/idle.png");
    assert_eq!(client.version().await.unwrap().version, "2.1.0");

    client.reload().await.unwrap();
    let request = last_request(&log);
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/reload");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = KeybrameClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = client.settings().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Transport(_)), "{:?}", err);
}
