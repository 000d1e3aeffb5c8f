//! End-to-end tests over AppService: chain → router → handler → store,
//! with the backing document on disk.

use std::fs;
use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};
use tempfile::TempDir;

use recordroute::middleware::{AuditLogStage, Chain};
use recordroute::registry;
use recordroute::router::Router;
use recordroute::server::{AppService, ParsedRequest, ResponseBody};
use recordroute::store::RecordStore;

fn service(dir: &TempDir, seed: &str) -> AppService {
    let data = dir.path().join("records.json");
    fs::write(&data, seed).unwrap();
    let store = RecordStore::open(&data).unwrap();
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(AuditLogStage::new(dir.path().join("log.txt"))));
    let mut router = Router::new();
    registry::register_routes(&mut router);
    AppService::new(chain, router, store)
}

fn json_body(body: &ResponseBody) -> &Value {
    match body {
        ResponseBody::Json(value) => value,
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[test]
fn test_list_users_returns_collection() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, r#"[{"id":1,"first_name":"Ann"}]"#);

    let res = svc.handle(&ParsedRequest::new(Method::GET, "/api/users", "t"));
    assert_eq!(res.status, 200);
    assert_eq!(json_body(&res.body), &json!([{"id": 1, "first_name": "Ann"}]));
}

#[test]
fn test_get_user_by_path_param() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, r#"[{"id":1,"first_name":"Ann"},{"id":2,"first_name":"Bo"}]"#);

    let res = svc.handle(&ParsedRequest::new(Method::GET, "/api/users/2", "t"));
    assert_eq!(res.status, 200);
    assert_eq!(json_body(&res.body), &json!({"id": 2, "first_name": "Bo"}));
}

#[test]
fn test_get_unknown_user_is_404() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, "[]");

    let res = svc.handle(&ParsedRequest::new(Method::GET, "/api/users/9", "t"));
    assert_eq!(res.status, 404);
}

#[test]
fn test_create_then_get() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, r#"[{"id":1,"first_name":"Ann"}]"#);

    let create = ParsedRequest::new(Method::POST, "/api/users", "t")
        .with_body(json!({"first_name": "Bo"}));
    let res = svc.handle(&create);
    assert_eq!(res.status, 201);
    assert_eq!(json_body(&res.body), &json!({"status": "success", "id": 2}));

    let res = svc.handle(&ParsedRequest::new(Method::GET, "/api/users/2", "t"));
    assert_eq!(json_body(&res.body), &json!({"id": 2, "first_name": "Bo"}));

    // The mutation reached the backing document before the response.
    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("records.json")).unwrap())
            .unwrap();
    assert_eq!(on_disk.as_array().unwrap().len(), 2);
}

#[test]
fn test_patch_merges_fields() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, r#"[{"id":1,"first_name":"Ann","city":"Pune"}]"#);

    let patch = ParsedRequest::new(Method::PATCH, "/api/users/1", "t")
        .with_body(json!({"first_name": "Anna"}));
    let res = svc.handle(&patch);
    assert_eq!(res.status, 200);
    assert_eq!(
        json_body(&res.body),
        &json!({"status": "success", "user": {"id": 1, "first_name": "Anna", "city": "Pune"}})
    );
}

#[test]
fn test_delete_then_get_is_404() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, r#"[{"id":1,"first_name":"Ann"}]"#);

    let res = svc.handle(&ParsedRequest::new(Method::DELETE, "/api/users/1", "t"));
    assert_eq!(res.status, 200);
    let res = svc.handle(&ParsedRequest::new(Method::GET, "/api/users/1", "t"));
    assert_eq!(res.status, 404);
}

#[test]
fn test_unroutable_path_is_404() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, "[]");
    let res = svc.handle(&ParsedRequest::new(Method::GET, "/api/pets", "t"));
    assert_eq!(res.status, 404);
}

#[test]
fn test_html_fragment_endpoint() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, r#"[{"id":1,"first_name":"Ann"},{"id":2,"first_name":"Bo"}]"#);

    let res = svc.handle(&ParsedRequest::new(Method::GET, "/users", "t"));
    assert_eq!(res.status, 200);
    assert_eq!(res.content_type(), "text/html");
    match &res.body {
        ResponseBody::Html(markup) => {
            assert_eq!(markup, "<ul><li>Ann</li><li>Bo</li></ul>");
        }
        other => panic!("expected HTML body, got {other:?}"),
    }
}

#[test]
fn test_form_encoded_create_matches_json_create() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, "[]");

    let form = recordroute::server::parse_body(
        "application/x-www-form-urlencoded",
        "first_name=Ann",
    )
    .unwrap();
    let res = svc.handle(&ParsedRequest::new(Method::POST, "/api/users", "t").with_body(form));
    assert_eq!(res.status, 201);

    let res = svc.handle(&ParsedRequest::new(Method::GET, "/api/users/1", "t"));
    assert_eq!(json_body(&res.body), &json!({"id": 1, "first_name": "Ann"}));
}

#[test]
fn test_audit_log_line_per_request() {
    let dir = TempDir::new().unwrap();
    let mut svc = service(&dir, "[]");

    svc.handle(&ParsedRequest::new(Method::GET, "/api/users", "192.168.0.7:1234"));
    svc.handle(&ParsedRequest::new(Method::GET, "/users", "192.168.0.7:1234"));

    let log = fs::read_to_string(dir.path().join("log.txt")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("192.168.0.7:1234 GET /api/users"));
    assert!(lines[1].contains("192.168.0.7:1234 GET /users"));
}
