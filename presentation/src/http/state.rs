//! Application state for API handlers

use council_application::{AgentInvoker, CollectVotesUseCase, DeliberateUseCase, ExpertEvaluator};
use council_domain::{ConstitutionConfig, CouncilConfig, StrictnessLevel};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Constitutions and councils the API can resolve by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    constitutions: Vec<Arc<ConstitutionConfig>>,
    councils: BTreeMap<String, Arc<CouncilConfig>>,
}

impl Catalog {
    pub fn new(
        constitutions: impl IntoIterator<Item = Arc<ConstitutionConfig>>,
        councils: impl IntoIterator<Item = Arc<CouncilConfig>>,
    ) -> Self {
        Self {
            constitutions: constitutions.into_iter().collect(),
            councils: councils
                .into_iter()
                .map(|c| (c.id().to_string(), c))
                .collect(),
        }
    }

    pub fn constitution(&self, id: &str) -> Option<Arc<ConstitutionConfig>> {
        self.constitutions.iter().find(|c| c.id == id).cloned()
    }

    pub fn council(&self, id: &str) -> Option<Arc<CouncilConfig>> {
        self.councils.get(id).cloned()
    }

    pub fn constitutions(&self) -> &[Arc<ConstitutionConfig>] {
        &self.constitutions
    }

    pub fn councils(&self) -> impl Iterator<Item = &Arc<CouncilConfig>> {
        self.councils.values()
    }
}

/// Values used when a request leaves a field out
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    pub tenant_id: String,
    pub strictness: StrictnessLevel,
    pub council_id: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            tenant_id: "default".to_string(),
            strictness: StrictnessLevel::default(),
            council_id: "default".to_string(),
        }
    }
}

/// Shared application state
pub struct AppState<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static> {
    pub deliberate: Arc<DeliberateUseCase<A, E>>,
    pub votes: Arc<CollectVotesUseCase<E>>,
    pub catalog: Arc<Catalog>,
    pub defaults: Arc<RequestDefaults>,
    /// Parent of every request's cancellation token
    pub shutdown: CancellationToken,
    pub version: String,
}

impl<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static> AppState<A, E> {
    pub fn new(
        deliberate: DeliberateUseCase<A, E>,
        votes: CollectVotesUseCase<E>,
        catalog: Catalog,
    ) -> Self {
        Self {
            deliberate: Arc::new(deliberate),
            votes: Arc::new(votes),
            catalog: Arc::new(catalog),
            defaults: Arc::new(RequestDefaults::default()),
            shutdown: CancellationToken::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_defaults(mut self, defaults: RequestDefaults) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

// Manual impl: the use cases are shared through `Arc`, so `A` and `E` need not be `Clone`
impl<A: AgentInvoker + 'static, E: ExpertEvaluator + 'static> Clone for AppState<A, E> {
    fn clone(&self) -> Self {
        Self {
            deliberate: Arc::clone(&self.deliberate),
            votes: Arc::clone(&self.votes),
            catalog: Arc::clone(&self.catalog),
            defaults: Arc::clone(&self.defaults),
            shutdown: self.shutdown.clone(),
            version: self.version.clone(),
        }
    }
}
