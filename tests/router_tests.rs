//! Tests for route registration, placeholder capture, and the
//! first-registered-wins tie-break.

use std::sync::Arc;

use http::Method;

use recordroute::context::RequestContext;
use recordroute::router::{ParamVec, Router};
use recordroute::server::{HandlerResponse, ParsedRequest};
use recordroute::store::RecordStore;

fn tagged(tag: &'static str) -> Arc<dyn recordroute::router::Handler> {
    Arc::new(
        move |_req: &ParsedRequest,
              _params: &ParamVec,
              _ctx: &RequestContext,
              _store: &mut RecordStore|
              -> HandlerResponse { HandlerResponse::text(200, tag) },
    )
}

#[test]
fn test_resolve_binds_placeholder() {
    let mut router = Router::new();
    router.register(Method::GET, "/api/users/{id}", tagged("get_user"));

    let matched = router.resolve(&Method::GET, "/api/users/7").unwrap();
    assert_eq!(matched.get_path_param("id"), Some("7"));
    assert_eq!(matched.template, "/api/users/{id}");
}

#[test]
fn test_method_must_match_exactly() {
    let mut router = Router::new();
    router.register(Method::GET, "/api/users", tagged("list"));
    assert!(router.resolve(&Method::POST, "/api/users").is_none());
    assert!(router.resolve(&Method::GET, "/api/users").is_some());
}

#[test]
fn test_no_match_for_unknown_path() {
    let mut router = Router::new();
    router.register(Method::GET, "/api/users", tagged("list"));
    assert!(router.resolve(&Method::GET, "/api/pets").is_none());
    assert!(router.resolve(&Method::GET, "/api/users/extra").is_none());
}

#[test]
fn test_first_registered_match_wins() {
    let mut router = Router::new();
    router.register(Method::GET, "/api/users/me", tagged("literal"));
    router.register(Method::GET, "/api/users/{id}", tagged("placeholder"));

    // Overlapping templates resolve by registration order.
    let matched = router.resolve(&Method::GET, "/api/users/me").unwrap();
    assert_eq!(matched.template, "/api/users/me");

    let matched = router.resolve(&Method::GET, "/api/users/7").unwrap();
    assert_eq!(matched.template, "/api/users/{id}");
}

#[test]
fn test_placeholder_requires_nonempty_segment() {
    let mut router = Router::new();
    router.register(Method::GET, "/api/users/{id}", tagged("get_user"));
    assert!(router.resolve(&Method::GET, "/api/users/").is_none());
}
