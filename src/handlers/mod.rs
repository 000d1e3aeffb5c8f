//! Terminal handlers for the record routes.
//!
//! Each handler reads or mutates the record store and translates store
//! errors into wire responses itself. Mutating handlers respond only after
//! the persistence write has completed or failed.

mod create_user;
mod delete_user;
mod get_user;
mod list_users;
mod render_users;
mod update_user;

pub use create_user::create_user;
pub use delete_user::delete_user;
pub use get_user::get_user;
pub use list_users::list_users;
pub use render_users::render_users;
pub use update_user::update_user;

use crate::router::ParamVec;
use crate::server::HandlerResponse;
use crate::store::StoreError;

/// Parse the `{id}` path parameter as a decimal integer.
pub(crate) fn id_param(params: &ParamVec) -> Result<u64, HandlerResponse> {
    params
        .iter()
        .rfind(|(k, _)| k.as_ref() == "id")
        .and_then(|(_, v)| v.parse::<u64>().ok())
        .ok_or_else(|| HandlerResponse::error(400, "invalid id"))
}

/// Map a store error onto the wire: unknown id is 404, a failed write of the
/// backing document is 500.
pub(crate) fn store_error_response(err: &StoreError) -> HandlerResponse {
    match err {
        StoreError::NotFound { .. } => HandlerResponse::error(404, &err.to_string()),
        _ => HandlerResponse::error(500, &err.to_string()),
    }
}
