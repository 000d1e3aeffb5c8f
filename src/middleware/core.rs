use thiserror::Error;

use crate::context::RequestContext;
use crate::server::{HandlerResponse, ParsedRequest};

/// Errors surfaced by the chain controller.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A stage returned without doing exactly one of: proceeding to the next
    /// stage, or writing a terminal response. The reference behavior for this
    /// usage error was a silent hang (no response ever sent) or a
    /// double-processed request; the controller detects it instead.
    #[error("middleware stage {stage} broke the proceed/respond contract")]
    ContractViolation { stage: usize },
}

#[derive(Debug)]
enum NextState {
    Untouched,
    Proceeded,
    Responded(HandlerResponse),
    Violated,
}

/// Continuation handed to each stage.
///
/// A stage must call [`Next::proceed`] or [`Next::respond`] exactly once
/// before returning. The controller inspects the recorded state after the
/// stage returns and raises [`ChainError::ContractViolation`] when the
/// contract was broken.
#[derive(Debug)]
pub struct Next {
    state: NextState,
}

impl Next {
    pub(crate) fn new() -> Self {
        Self {
            state: NextState::Untouched,
        }
    }

    /// Hand control to the next stage in the chain.
    pub fn proceed(&mut self) {
        self.state = match self.state {
            NextState::Untouched => NextState::Proceeded,
            _ => NextState::Violated,
        };
    }

    /// Terminate the exchange with `response`; no further stage runs.
    pub fn respond(&mut self, response: HandlerResponse) {
        self.state = match self.state {
            NextState::Untouched => NextState::Responded(response),
            _ => NextState::Violated,
        };
    }

    pub(crate) fn into_outcome(self, stage: usize) -> Result<Option<HandlerResponse>, ChainError> {
        match self.state {
            NextState::Proceeded => Ok(None),
            NextState::Responded(response) => Ok(Some(response)),
            NextState::Untouched | NextState::Violated => {
                Err(ChainError::ContractViolation { stage })
            }
        }
    }
}

/// One position in the middleware chain.
///
/// Stages execute strictly in registration order, once per request,
/// synchronously relative to each other. A stage may inspect the request,
/// annotate the [`RequestContext`] for later stages, short-circuit with a
/// terminal response, or forward via `next.proceed()`.
pub trait Stage: Send + Sync {
    fn handle(&self, req: &ParsedRequest, ctx: &mut RequestContext, next: &mut Next);
}

impl<F> Stage for F
where
    F: Fn(&ParsedRequest, &mut RequestContext, &mut Next) + Send + Sync,
{
    fn handle(&self, req: &ParsedRequest, ctx: &mut RequestContext, next: &mut Next) {
        self(req, ctx, next)
    }
}
