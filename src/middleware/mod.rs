mod audit;
mod chain;
mod core;

pub use audit::{append_audit_line, AnnotateStage, AuditLogStage};
pub use chain::Chain;
pub use core::{ChainError, Next, Stage};
