//! Context management for MCP server tools
//!
//! Holds the shared dependencies of tool execution: the static model
//! catalog, the per-process budget tracker, and the Replicate client.
//! Constructed once at startup and cloned per request; tests build their
//! own context against a mock server and an isolated budget.

use std::sync::Arc;

use mediaforge_catalog::{ModelCatalog, CATALOG};
use mediaforge_replicate::ReplicateClient;

use crate::budget::BudgetTracker;
use crate::config::Config;

/// Context for tool execution that holds dependencies.
#[derive(Clone)]
pub struct ToolContext {
    pub(crate) catalog: &'static ModelCatalog,
    pub(crate) budget: Arc<BudgetTracker>,
    pub(crate) client: Arc<ReplicateClient>,
}

impl ToolContext {
    /// Production context: the embedded catalog, a fresh budget tracker at
    /// the configured ceiling, and a client against the real API.
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: &CATALOG,
            budget: Arc::new(BudgetTracker::new(config.budget_limit)),
            client: Arc::new(ReplicateClient::new(config.api_token.clone())),
        }
    }

    /// Context with explicit parts. Used by tests to inject a mock-server
    /// client and an isolated budget.
    pub fn with_parts(client: ReplicateClient, budget_limit: f64) -> Self {
        Self {
            catalog: &CATALOG,
            budget: Arc::new(BudgetTracker::new(budget_limit)),
            client: Arc::new(client),
        }
    }

    pub fn budget(&self) -> &BudgetTracker {
        &self.budget
    }

    pub fn catalog(&self) -> &'static ModelCatalog {
        self.catalog
    }
}
