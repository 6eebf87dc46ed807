//! reqwest adapters for the agent and expert boundaries

mod agent;
mod client;
mod expert;

pub use agent::HttpAgentInvoker;
pub use client::JsonEndpointClient;
pub use expert::HttpExpertEvaluator;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::post;
    use council_application::{
        AgentContext, AgentInvoker, CouncilContext, ExpertEvaluator, InvokeError,
    };
    use council_domain::{AgentRole, ExpertSeat};
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn agent_handler(
        Path(role): Path<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        let strategy_ref = body["strategy_ref"].as_str().unwrap_or("?");
        match role.as_str() {
            "researcher" => (
                StatusCode::OK,
                json!({
                    "content": format!("findings for {}", strategy_ref),
                    "grounding": ["doc:1", "doc:2"]
                })
                .to_string(),
            ),
            "synthesiser" => (StatusCode::OK, "not json".to_string()),
            "strategist" => (StatusCode::GATEWAY_TIMEOUT, String::new()),
            "adversary" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                (StatusCode::OK, json!({"content": "late"}).to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
        }
    }

    async fn expert_handler(
        Path(discipline): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let context_ref = body["context"]["context_ref"].as_str().unwrap_or("?");
        Json(json!({
            "score": body["weight"].as_f64().unwrap_or(0.0) * 2.0,
            "veto": discipline == "economics",
            "rationale": format!("{} on {}", discipline, context_ref),
        }))
    }

    async fn serve() -> String {
        let app = Router::new()
            .route("/agents/:role/invoke", post(agent_handler))
            .route("/experts/:discipline/evaluate", post(expert_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn context(role: AgentRole) -> AgentContext {
        AgentContext {
            session_id: "s-1".to_string(),
            tenant_id: "acme".to_string(),
            strategy_ref: "strategy:9".to_string(),
            role,
            round: 0,
            context_ref: "s-1/0".to_string(),
            transcript: Vec::new(),
            feedback: Vec::new(),
            constitutions: vec!["house_rules".to_string()],
        }
    }

    fn client(base: &str) -> JsonEndpointClient {
        JsonEndpointClient::new(base, Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn test_agent_invoker_maps_responses() {
        let base = serve().await;
        let invoker = HttpAgentInvoker::new(client(&base));

        let output = invoker
            .invoke(AgentRole::Researcher, &context(AgentRole::Researcher))
            .await
            .unwrap();
        assert_eq!(output.content, "findings for strategy:9");
        assert_eq!(output.grounding.len(), 2);

        match invoker
            .invoke(AgentRole::Synthesiser, &context(AgentRole::Synthesiser))
            .await
        {
            Err(InvokeError::Malformed { payload, .. }) => assert_eq!(payload, "not json"),
            other => panic!("expected malformed, got {other:?}"),
        }

        assert_eq!(
            invoker
                .invoke(AgentRole::Strategist, &context(AgentRole::Strategist))
                .await,
            Err(InvokeError::Timeout)
        );
        assert_eq!(
            invoker
                .invoke(AgentRole::Adversary, &context(AgentRole::Adversary))
                .await,
            Err(InvokeError::Timeout)
        );
        assert!(matches!(
            invoker
                .invoke(AgentRole::Recommender, &context(AgentRole::Recommender))
                .await,
            Err(InvokeError::Failed(msg)) if msg.contains("500")
        ));
    }

    #[tokio::test]
    async fn test_expert_evaluator_posts_seat_and_context() {
        let base = serve().await;
        let evaluator = HttpExpertEvaluator::new(client(&base));

        let assessment = evaluator
            .evaluate(
                &ExpertSeat::new("economics", 0.4),
                &CouncilContext::new("ctx:7"),
            )
            .await
            .unwrap();
        assert!((assessment.score - 0.8).abs() < 1e-9);
        assert!(assessment.veto);
        assert_eq!(assessment.rationale, "economics on ctx:7");
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let invoker = HttpAgentInvoker::new(client(&format!("http://{}", addr)));
        assert!(matches!(
            invoker
                .invoke(AgentRole::Researcher, &context(AgentRole::Researcher))
                .await,
            Err(InvokeError::Failed(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(
            client("http://agents:9000/").base_url(),
            "http://agents:9000"
        );
    }
}
