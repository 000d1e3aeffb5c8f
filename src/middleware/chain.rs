use std::sync::Arc;

use tracing::debug;

use super::core::{ChainError, Next, Stage};
use crate::context::RequestContext;
use crate::server::{HandlerResponse, ParsedRequest};

/// Ordered middleware chain, fixed at startup.
///
/// Stages are identified by position, not name. The controller drives the
/// chain one stage at a time and tracks whether the current stage advanced or
/// terminated, enforcing the single-invocation contract rather than relying
/// on stage authors to uphold it by convention.
#[derive(Default)]
pub struct Chain {
    stages: Vec<Arc<dyn Stage>>,
}

impl Chain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage; stages run in the order they were added.
    pub fn add_stage(&mut self, stage: Arc<dyn Stage>) {
        self.stages.push(stage);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run the chain for one request.
    ///
    /// Returns `Ok(Some(response))` when a stage short-circuited,
    /// `Ok(None)` when every stage proceeded and the request should be
    /// forwarded to the router, and `Err` when a stage broke the
    /// proceed/respond contract.
    pub fn run(
        &self,
        req: &ParsedRequest,
        ctx: &mut RequestContext,
    ) -> Result<Option<HandlerResponse>, ChainError> {
        for (idx, stage) in self.stages.iter().enumerate() {
            let mut next = Next::new();
            stage.handle(req, ctx, &mut next);
            match next.into_outcome(idx)? {
                Some(response) => {
                    debug!(
                        stage = idx,
                        status = response.status,
                        "Middleware stage terminated the exchange"
                    );
                    return Ok(Some(response));
                }
                None => {
                    debug!(stage = idx, "Middleware stage proceeded");
                }
            }
        }
        Ok(None)
    }
}
