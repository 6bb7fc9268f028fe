use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use tempfile::TempDir;

fn tenantctl() -> Command {
    let mut cmd = Command::cargo_bin("tenantctl").unwrap();
    cmd.env_remove("TENANTCTL_DOMAIN")
        .env_remove("TENANTCTL_ACCESS_TOKEN")
        .env_remove("TENANTCTL_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, api_url: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    let body = serde_json::json!({
        "default_tenant": "acme.example.com",
        "tenants": {
            "acme.example.com": {
                "name": "acme",
                "domain": "acme.example.com",
                "access_token": "test-token",
                "api_url": api_url,
            }
        }
    });
    fs::write(&path, body.to_string()).unwrap();
    path
}

// The CLI runs in a child process, so the server needs a runtime of its own.
fn spawn_server() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let app = Router::new()
                .route("/api/v2/tenants/settings", get(settings).patch(patched))
                .route("/api/v2/connections", get(connections))
                .route("/api/v2/connections/{id}", get(missing_connection));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    let addr = rx.recv().unwrap();
    format!("http://{addr}/api/v2")
}

async fn settings(headers: HeaderMap) -> (StatusCode, Json<serde_json::Value>) {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or_default();
    if auth != "Bearer test-token" {
        return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"message": "bad token"})));
    }
    (StatusCode::OK, Json(serde_json::json!({"friendly_name": "Acme"})))
}

async fn patched(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    Json(serde_json::json!({"patched": body}))
}

async fn connections() -> Json<serde_json::Value> {
    Json(serde_json::json!([{"id": "con_1", "name": "db"}]))
}

async fn missing_connection() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "statusCode": 404,
            "error": "Not Found",
            "message": "The connection does not exist",
            "errorCode": "inexistent_connection"
        })),
    )
}

#[test]
fn invalid_method_is_rejected() {
    tenantctl()
        .args(["api", "fetch", "tenants/settings"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn invalid_json_payload_is_rejected() {
    tenantctl()
        .args(["api", "post", "clients", "--data", "{not json"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn delete_requires_force() {
    let out = tenantctl()
        .args(["api", "delete", "actions/actions/act_1"])
        .assert()
        .failure()
        .code(2)
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("--force"));
}

#[test]
fn missing_config_is_not_logged_in() {
    let dir = TempDir::new().unwrap();
    let out = tenantctl()
        .args(["list", "connections", "--config"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .code(2)
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("not logged in"));
}

#[test]
fn unknown_resource_is_a_usage_error() {
    tenantctl().args(["list", "widgets"]).assert().failure().code(2);
}

#[test]
fn api_get_prints_json() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &spawn_server());

    let out = tenantctl()
        .env("TENANTCTL_CONFIG", &config)
        .args(["api", "tenants/settings", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["friendly_name"], "Acme");
}

#[test]
fn api_method_from_piped_data() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &spawn_server());

    let out = tenantctl()
        .env("TENANTCTL_CONFIG", &config)
        .args(["api", "patch", "tenants/settings", "--format", "json"])
        .write_stdin(r#"{"friendly_name":"Renamed"}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["patched"]["friendly_name"], "Renamed");
}

#[test]
fn list_collection() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &spawn_server());

    let out = tenantctl()
        .args(["list", "connections", "--format", "json", "--config"])
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json[0]["id"], "con_1");
}

#[test]
fn show_missing_item_reports_api_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &spawn_server());

    let out = tenantctl()
        .args(["show", "connections", "con_404", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .code(3)
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("The connection does not exist"));
}

#[test]
fn show_collection_without_id_is_rejected() {
    tenantctl().args(["show", "users"]).assert().failure().code(2);
}
