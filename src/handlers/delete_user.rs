use serde_json::json;

use super::{id_param, store_error_response};
use crate::context::RequestContext;
use crate::router::ParamVec;
use crate::server::{HandlerResponse, ParsedRequest};
use crate::store::RecordStore;

/// `DELETE /api/users/{id}` — remove the record and rewrite the remaining
/// collection. Success is reported only after the write call returned.
pub fn delete_user(
    _req: &ParsedRequest,
    params: &ParamVec,
    _ctx: &RequestContext,
    store: &mut RecordStore,
) -> HandlerResponse {
    let id = match id_param(params) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match store.delete(id) {
        Ok(()) => HandlerResponse::json(200, json!({ "status": "success" })),
        Err(err) => store_error_response(&err),
    }
}
