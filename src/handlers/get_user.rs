use serde_json::Value;

use super::{id_param, store_error_response};
use crate::context::RequestContext;
use crate::router::ParamVec;
use crate::server::{HandlerResponse, ParsedRequest};
use crate::store::RecordStore;

/// `GET /api/users/{id}` — one record, or a distinguishable 404 for an
/// unknown id.
pub fn get_user(
    _req: &ParsedRequest,
    params: &ParamVec,
    _ctx: &RequestContext,
    store: &mut RecordStore,
) -> HandlerResponse {
    let id = match id_param(params) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match store.get(id) {
        Ok(record) => HandlerResponse::json(200, Value::Object(record.clone())),
        Err(err) => store_error_response(&err),
    }
}
