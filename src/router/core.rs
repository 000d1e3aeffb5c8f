use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::context::RequestContext;
use crate::server::{HandlerResponse, ParsedRequest};
use crate::store::RecordStore;

/// Maximum number of path parameters before heap allocation.
/// Templates here carry at most one placeholder segment, so the inline
/// capacity is never exceeded in practice.
pub const MAX_INLINE_PARAMS: usize = 4;

/// Stack-allocated parameter storage for the match path.
///
/// Param names are `Arc<str>` because they come from the static route table
/// and cloning them per request is an O(1) refcount bump; values are
/// per-request data from the URL and stay `String`.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Terminal handler bound to one route.
///
/// Handlers receive the parsed request, the parameters extracted from the
/// path, the request context populated by the middleware chain, and mutable
/// access to the record store. They translate store errors into responses
/// themselves; the router never catches or reinterprets handler failures.
pub trait Handler: Send + Sync {
    fn handle(
        &self,
        req: &ParsedRequest,
        params: &ParamVec,
        ctx: &RequestContext,
        store: &mut RecordStore,
    ) -> HandlerResponse;
}

impl<F> Handler for F
where
    F: Fn(&ParsedRequest, &ParamVec, &RequestContext, &mut RecordStore) -> HandlerResponse
        + Send
        + Sync,
{
    fn handle(
        &self,
        req: &ParsedRequest,
        params: &ParamVec,
        ctx: &RequestContext,
        store: &mut RecordStore,
    ) -> HandlerResponse {
        self(req, params, ctx, store)
    }
}

enum Segment {
    Literal(String),
    Param(Arc<str>),
}

struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template like `/api/users/{id}` into matchable segments.
    ///
    /// A `{name}` segment matches any non-empty literal segment and binds its
    /// value under `name`; every other segment must match exactly.
    fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Segment::Param(Arc::from(name))
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// Match a request path against the template, extracting parameters.
    fn capture(&self, path: &str) -> Option<ParamVec> {
        let mut params = ParamVec::new();
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        for expected in &self.segments {
            let actual = segments.next()?;
            match expected {
                Segment::Literal(lit) => {
                    if lit != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.push((Arc::clone(name), actual.to_string()));
                }
            }
        }
        if segments.next().is_some() {
            return None;
        }
        Some(params)
    }
}

struct Route {
    method: Method,
    template: PathTemplate,
    handler: Arc<dyn Handler>,
}

/// Result of successfully resolving a request to a route.
pub struct RouteMatch {
    /// The handler registered for the matched route.
    pub handler: Arc<dyn Handler>,
    /// Parameters bound by placeholder segments (e.g. `{id}` → `("id", "7")`).
    pub path_params: ParamVec,
    /// The template the request matched, for logging.
    pub template: String,
}

impl RouteMatch {
    /// Get a path parameter by name. Last occurrence wins if a name repeats.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Maps an (HTTP method, path template) pair to a terminal handler.
///
/// The route table is process-wide configuration fixed at startup. Resolution
/// is a linear scan in registration order; when templates overlap, the first
/// registered match wins. That tie-break is a deliberate, deterministic
/// policy, so registration order is part of the configuration.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` and `template` at startup.
    pub fn register(&mut self, method: Method, template: &str, handler: Arc<dyn Handler>) {
        info!(method = %method, template = %template, "Route registered");
        self.routes.push(Route {
            method,
            template: PathTemplate::parse(template),
            handler,
        });
    }

    /// Resolve a request to a handler and its extracted path parameters.
    ///
    /// Exact method match is required. `None` means no route matched and the
    /// boundary layer should produce the not-found response.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            if let Some(params) = route.template.capture(path) {
                debug!(
                    method = %method,
                    path = %path,
                    template = %route.template.raw,
                    "Route matched"
                );
                return Some(RouteMatch {
                    handler: Arc::clone(&route.handler),
                    path_params: params,
                    template: route.template.raw.clone(),
                });
            }
        }
        warn!(method = %method, path = %path, "No route matched");
        None
    }
}
