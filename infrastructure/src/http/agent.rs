//! HTTP adapter for the debate agents
//!
//! `POST {base_url}/agents/{role}/invoke` with the [`AgentContext`] as body;
//! the response must be an [`AgentOutput`] (`{content, grounding?}`).

use super::client::JsonEndpointClient;
use async_trait::async_trait;
use council_application::{AgentContext, AgentInvoker, AgentOutput, InvokeError};
use council_domain::AgentRole;

pub struct HttpAgentInvoker {
    client: JsonEndpointClient,
}

impl HttpAgentInvoker {
    pub fn new(client: JsonEndpointClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AgentInvoker for HttpAgentInvoker {
    async fn invoke(
        &self,
        role: AgentRole,
        context: &AgentContext,
    ) -> Result<AgentOutput, InvokeError> {
        let path = format!("/agents/{}/invoke", role.as_str());
        self.client.post(&path, context).await
    }
}
