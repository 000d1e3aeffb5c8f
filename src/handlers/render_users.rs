use crate::context::RequestContext;
use crate::router::ParamVec;
use crate::server::{HandlerResponse, ParsedRequest};
use crate::store::RecordStore;

/// `GET /users` — server-rendered variant: an unordered list of each
/// record's `first_name` display field, for browser consumption.
pub fn render_users(
    _req: &ParsedRequest,
    _params: &ParamVec,
    _ctx: &RequestContext,
    store: &mut RecordStore,
) -> HandlerResponse {
    let mut markup = String::from("<ul>");
    for record in store.list() {
        let name = record
            .get("first_name")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        markup.push_str("<li>");
        markup.push_str(name);
        markup.push_str("</li>");
    }
    markup.push_str("</ul>");
    HandlerResponse::html(200, markup)
}
