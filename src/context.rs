use std::collections::HashMap;

use serde_json::Value;

/// Per-request bag of key/value annotations.
///
/// Created empty when a request arrives, threaded through the middleware
/// chain alongside the request, and dropped once the response is written.
/// Stages earlier in the chain populate it; later stages and terminal
/// handlers read it. Order dependence is intentional: a later stage may rely
/// on an earlier one having run. Never shared across requests, so no
/// synchronization is needed.
#[derive(Debug, Default)]
pub struct RequestContext {
    values: HashMap<String, Value>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}
