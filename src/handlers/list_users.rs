use serde_json::Value;

use crate::context::RequestContext;
use crate::router::ParamVec;
use crate::server::{HandlerResponse, ParsedRequest};
use crate::store::RecordStore;

/// `GET /api/users` — the full collection as a JSON array.
pub fn list_users(
    _req: &ParsedRequest,
    _params: &ParamVec,
    _ctx: &RequestContext,
    store: &mut RecordStore,
) -> HandlerResponse {
    let records = store
        .list()
        .iter()
        .cloned()
        .map(Value::Object)
        .collect::<Vec<_>>();
    HandlerResponse::json(200, Value::Array(records))
}
