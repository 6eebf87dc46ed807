//! HTTP adapter for council experts
//!
//! `POST {base_url}/experts/{discipline}/evaluate` with the seat weight and
//! the [`CouncilContext`]; the response is an [`ExpertAssessment`].

use super::client::JsonEndpointClient;
use async_trait::async_trait;
use council_application::{CouncilContext, ExpertAssessment, ExpertEvaluator, InvokeError};
use council_domain::ExpertSeat;
use serde::Serialize;

#[derive(Serialize)]
struct EvaluateRequest<'a> {
    discipline: &'a str,
    weight: f64,
    context: &'a CouncilContext,
}

pub struct HttpExpertEvaluator {
    client: JsonEndpointClient,
}

impl HttpExpertEvaluator {
    pub fn new(client: JsonEndpointClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExpertEvaluator for HttpExpertEvaluator {
    async fn evaluate(
        &self,
        seat: &ExpertSeat,
        context: &CouncilContext,
    ) -> Result<ExpertAssessment, InvokeError> {
        let path = format!("/experts/{}/evaluate", seat.id);
        let request = EvaluateRequest {
            discipline: &seat.id,
            weight: seat.weight,
            context,
        };
        self.client.post(&path, &request).await
    }
}
