mod core;

pub use core::{Handler, ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
