use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::debug;

use super::core::{Next, Stage};
use crate::context::RequestContext;
use crate::server::ParsedRequest;

/// Append one audit line to the plain-text log at `path`:
/// `timestamp: clientAddr method path`, timestamp in Unix milliseconds.
///
/// Audit logging is best-effort. A failed write is swallowed and never
/// blocks or fails the surrounding request; the only trace it leaves is a
/// debug event on the diagnostic subscriber.
pub fn append_audit_line(path: &Path, client_addr: &str, method: &str, req_path: &str) {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let line = format!("{millis}: {client_addr} {method} {req_path}\n");
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(line.as_bytes()));
    if let Err(err) = result {
        debug!(error = %err, path = %path.display(), "Audit log write failed");
    }
}

/// Logging stage: appends the audit line for the request, then proceeds.
///
/// The write (or its failure) completes before the next stage runs, so the
/// log never lags behind the response path.
pub struct AuditLogStage {
    path: PathBuf,
}

impl AuditLogStage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Stage for AuditLogStage {
    fn handle(&self, req: &ParsedRequest, _ctx: &mut RequestContext, next: &mut Next) {
        append_audit_line(&self.path, &req.client_addr, req.method.as_str(), &req.path);
        next.proceed();
    }
}

/// Annotation stage: sets one fixed context key, then proceeds.
///
/// Later stages and terminal handlers can read the annotation from the
/// request context.
pub struct AnnotateStage {
    key: String,
    value: Value,
}

impl AnnotateStage {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Stage for AnnotateStage {
    fn handle(&self, _req: &ParsedRequest, ctx: &mut RequestContext, next: &mut Next) {
        ctx.set(self.key.clone(), self.value.clone());
        next.proceed();
    }
}
