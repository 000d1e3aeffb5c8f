use serde_json::json;

use super::store_error_response;
use crate::context::RequestContext;
use crate::router::ParamVec;
use crate::server::{HandlerResponse, ParsedRequest};
use crate::store::{record_id, RecordStore};

/// `POST /api/users` — create a record from a JSON or form-encoded body.
///
/// The response is produced only after the store has rewritten the backing
/// document, so success strictly implies persisted.
pub fn create_user(
    req: &ParsedRequest,
    _params: &ParamVec,
    _ctx: &RequestContext,
    store: &mut RecordStore,
) -> HandlerResponse {
    let fields = match req.body.as_ref().and_then(|b| b.as_object()) {
        Some(fields) => fields.clone(),
        None => return HandlerResponse::error(400, "expected an object body"),
    };
    match store.create(fields) {
        Ok(record) => HandlerResponse::json(
            201,
            json!({ "status": "success", "id": record_id(record) }),
        ),
        Err(err) => store_error_response(&err),
    }
}
