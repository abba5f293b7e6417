

#[cfg(test)]
mod integration_tests;

#[cfg(test)]
pub mod test_helpers {
    use crate::context::ToolContext;
    use mediaforge_replicate::ReplicateClient;
    use wiremock::MockServer;

    /// Context wired to a fresh mock Replicate server, with its own
    /// isolated budget tracker.
    pub async fn mock_context(budget_limit: f64) -> (MockServer, ToolContext) {
        let server = MockServer::start().await;
        let client = ReplicateClient::with_base_url("test-token".to_string(), server.uri());
        let context = ToolContext::with_parts(client, budget_limit);
        (server, context)
    }

    /// Context whose client points nowhere. For paths that must not reach
    /// the network (budget rejections, catalog/workflow tools).
    pub fn offline_context(budget_limit: f64) -> ToolContext {
        let client = ReplicateClient::with_base_url(
            "test-token".to_string(),
            "http://127.0.0.1:1".to_string(),
        );
        ToolContext::with_parts(client, budget_limit)
    }
}
