use loandoc_core::config::{CatalogConfig, EngineConfig};
use loandoc_core::estimate::{
    CsvLenderStore, EligibilityEvaluator, EstimateEngine, LenderConfig, LenderConfigStore,
    RuleSet, StaticLenderStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lender catalog selected by configuration.
#[derive(Debug, Clone)]
pub(crate) enum CatalogStore {
    Builtin(StaticLenderStore),
    Csv(CsvLenderStore),
}

impl LenderConfigStore for CatalogStore {
    fn list_lenders(&self, rule_set: RuleSet) -> Result<Vec<LenderConfig>, StoreError> {
        match self {
            CatalogStore::Builtin(store) => store.list_lenders(rule_set),
            CatalogStore::Csv(store) => store.list_lenders(rule_set),
        }
    }
}

impl fmt::Display for CatalogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogStore::Builtin(_) => write!(f, "builtin"),
            CatalogStore::Csv(store) => write!(f, "{}", store.directory().display()),
        }
    }
}

pub(crate) fn catalog_store(config: &CatalogConfig) -> CatalogStore {
    match &config.directory {
        Some(directory) => CatalogStore::Csv(CsvLenderStore::new(directory.clone())),
        None => CatalogStore::Builtin(StaticLenderStore::builtin()),
    }
}

pub(crate) fn estimate_engine(config: &EngineConfig) -> EstimateEngine {
    EstimateEngine::new(EligibilityEvaluator::standard(), config.parallel)
}
