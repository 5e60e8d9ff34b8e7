use std::sync::Arc;

use crate::cache::DurableStore;
use crate::orchestrator::AnalysisOrchestrator;

/// Shared handler state.
pub struct GatewayState<D: DurableStore + 'static> {
    pub orchestrator: Arc<AnalysisOrchestrator<D>>,
}

impl<D: DurableStore + 'static> GatewayState<D> {
    pub fn new(orchestrator: Arc<AnalysisOrchestrator<D>>) -> Self {
        Self { orchestrator }
    }
}

impl<D: DurableStore + 'static> Clone for GatewayState<D> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}
