//! Route table registration.
//!
//! The table is fixed at startup; registration order matters because the
//! router resolves first-registered-wins when templates overlap.

use std::sync::Arc;

use http::Method;

use crate::handlers;
use crate::router::Router;

/// Register the record routes against `router`.
pub fn register_routes(router: &mut Router) {
    router.register(Method::GET, "/api/users", Arc::new(handlers::list_users));
    router.register(Method::GET, "/api/users/{id}", Arc::new(handlers::get_user));
    router.register(Method::POST, "/api/users", Arc::new(handlers::create_user));
    router.register(
        Method::PATCH,
        "/api/users/{id}",
        Arc::new(handlers::update_user),
    );
    router.register(
        Method::DELETE,
        "/api/users/{id}",
        Arc::new(handlers::delete_user),
    );
    router.register(Method::GET, "/users", Arc::new(handlers::render_users));
}
