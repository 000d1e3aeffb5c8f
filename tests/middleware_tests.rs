//! Tests for middleware chain ordering, context propagation,
//! short-circuiting, and the proceed/respond contract.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::Method;
use serde_json::json;
use tempfile::tempdir;

use recordroute::context::RequestContext;
use recordroute::middleware::{AnnotateStage, AuditLogStage, Chain, ChainError, Next, Stage};
use recordroute::server::{HandlerResponse, ParsedRequest};

fn request() -> ParsedRequest {
    ParsedRequest::new(Method::GET, "/api/users", "10.0.0.1:9999")
}

/// Records the order it ran in and what it saw in the context.
struct ProbeStage {
    name: &'static str,
    ran: Arc<AtomicUsize>,
    seen_key: Option<String>,
}

impl Stage for ProbeStage {
    fn handle(&self, _req: &ParsedRequest, ctx: &mut RequestContext, next: &mut Next) {
        let order = self.ran.fetch_add(1, Ordering::SeqCst);
        if let Some(key) = &self.seen_key {
            assert_eq!(
                ctx.get(key),
                Some(&json!(1)),
                "stage {} expected annotation from an earlier stage",
                self.name
            );
        }
        assert!(order < 3);
        next.proceed();
    }
}

#[test]
fn test_later_stage_observes_earlier_annotation() {
    let ran = Arc::new(AtomicUsize::new(0));
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(AnnotateStage::new("k", 1)));
    chain.add_stage(Arc::new(ProbeStage {
        name: "B",
        ran: Arc::clone(&ran),
        seen_key: Some("k".to_string()),
    }));

    let mut ctx = RequestContext::new();
    let outcome = chain.run(&request(), &mut ctx).unwrap();
    assert!(outcome.is_none());
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.get("k"), Some(&json!(1)));
}

#[test]
fn test_terminating_stage_stops_the_chain() {
    let ran = Arc::new(AtomicUsize::new(0));
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(
        |_req: &ParsedRequest, _ctx: &mut RequestContext, next: &mut Next| {
            next.respond(HandlerResponse::json(200, json!({"msg": "stopped here"})));
        },
    ));
    chain.add_stage(Arc::new(ProbeStage {
        name: "B",
        ran: Arc::clone(&ran),
        seen_key: None,
    }));
    chain.add_stage(Arc::new(ProbeStage {
        name: "C",
        ran: Arc::clone(&ran),
        seen_key: None,
    }));

    let mut ctx = RequestContext::new();
    let response = chain.run(&request(), &mut ctx).unwrap().unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(ran.load(Ordering::SeqCst), 0, "B and C must not execute");
}

#[test]
fn test_contract_violation_reports_stage_index() {
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(AnnotateStage::new("k", 1)));
    chain.add_stage(Arc::new(
        |_req: &ParsedRequest, _ctx: &mut RequestContext, _next: &mut Next| {
            // Neither proceeds nor responds.
        },
    ));

    let mut ctx = RequestContext::new();
    let err = chain.run(&request(), &mut ctx).unwrap_err();
    assert!(matches!(err, ChainError::ContractViolation { stage: 1 }));
}

#[test]
fn test_proceed_then_respond_is_a_violation() {
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(
        |_req: &ParsedRequest, _ctx: &mut RequestContext, next: &mut Next| {
            next.proceed();
            next.respond(HandlerResponse::text(200, "too late"));
        },
    ));

    let mut ctx = RequestContext::new();
    assert!(chain.run(&request(), &mut ctx).is_err());
}

#[test]
fn test_audit_stage_writes_before_proceeding() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(AuditLogStage::new(&log_path)));
    // The next stage sees the log line already on disk.
    let log_for_probe = log_path.clone();
    chain.add_stage(Arc::new(
        move |_req: &ParsedRequest, _ctx: &mut RequestContext, next: &mut Next| {
            let contents = fs::read_to_string(&log_for_probe).unwrap();
            assert!(contents.contains("10.0.0.1:9999 GET /api/users"));
            next.proceed();
        },
    ));

    let mut ctx = RequestContext::new();
    assert!(chain.run(&request(), &mut ctx).unwrap().is_none());
}

#[test]
fn test_failed_audit_write_is_swallowed() {
    // Point the stage at a path whose parent does not exist; the append
    // fails, the chain still proceeds.
    let mut chain = Chain::new();
    chain.add_stage(Arc::new(AuditLogStage::new("/nonexistent-dir/log.txt")));
    let mut ctx = RequestContext::new();
    assert!(chain.run(&request(), &mut ctx).unwrap().is_none());
}
