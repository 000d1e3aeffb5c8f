//! # recordroute
//!
//! A small, middleware-driven HTTP request-handling core backed by a
//! JSON-file record store.
//!
//! Incoming requests flow through an ordered chain of middleware stages,
//! each of which may inspect the request, annotate a per-request context,
//! short-circuit with a terminal response, or forward to the next stage.
//! Requests that fall through the chain are resolved by a method/path router
//! to terminal handlers that read and mutate the record store, which
//! rewrites its backing JSON document synchronously after every mutation.
//!
//! ## Architecture
//!
//! - **[`store`]** - JSON-file-backed record collection with injected persistence
//! - **[`context`]** - per-request key/value annotations shared across chain stages
//! - **[`middleware`]** - ordered stage chain with an enforced proceed/respond contract
//! - **[`router`]** - (method, path template) → handler resolution with `{name}` placeholders
//! - **[`server`]** - HTTP boundary: request parsing, response framing, the
//!   router-driven [`server::AppService`], and the raw, switch-style
//!   [`server::raw`] dispatch loop
//! - **[`handlers`]** - terminal handlers for the record routes
//! - **[`registry`]** - startup route registration
//!
//! ## Request flow
//!
//! ```text
//! request → Chain (log / annotate / short-circuit)
//!         → Router → handler → RecordStore → response
//! ```
//!
//! ## Concurrency
//!
//! One logical worker handles a request end to end. The record store carries
//! no lock and no optimistic concurrency token; overlapping mutating calls
//! would race on its rewrite-the-whole-document persistence. The shipped
//! transports therefore service connections sequentially.
//!
//! ## Quick start
//!
//! ```no_run
//! use recordroute::{middleware::{AuditLogStage, Chain}, registry, router::Router,
//!                   server::AppService, store::RecordStore};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = RecordStore::open(Path::new("data/records.json"))?;
//! let mut chain = Chain::new();
//! chain.add_stage(Arc::new(AuditLogStage::new("log.txt")));
//! let mut router = Router::new();
//! registry::register_routes(&mut router);
//! AppService::new(chain, router, store).serve("127.0.0.1:8000")?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod handlers;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod server;
pub mod store;

pub use context::RequestContext;
pub use middleware::{Chain, ChainError, Next, Stage};
pub use router::{Handler, ParamVec, RouteMatch, Router};
pub use server::{AppService, HandlerResponse, ParsedRequest, ResponseBody};
pub use store::{Record, RecordStore, StoreError};
