use serde_json::{json, Value};

use super::{id_param, store_error_response};
use crate::context::RequestContext;
use crate::router::ParamVec;
use crate::server::{HandlerResponse, ParsedRequest};
use crate::store::RecordStore;

/// `PATCH /api/users/{id}` — merge the body's fields over the stored record.
///
/// Incoming fields win on collision; `id` stays what the store assigned.
pub fn update_user(
    req: &ParsedRequest,
    params: &ParamVec,
    _ctx: &RequestContext,
    store: &mut RecordStore,
) -> HandlerResponse {
    let id = match id_param(params) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let fields = match req.body.as_ref().and_then(|b| b.as_object()) {
        Some(fields) => fields.clone(),
        None => return HandlerResponse::error(400, "expected an object body"),
    };
    match store.update(id, fields) {
        Ok(record) => HandlerResponse::json(
            200,
            json!({ "status": "success", "user": Value::Object(record.clone()) }),
        ),
        Err(err) => store_error_response(&err),
    }
}
