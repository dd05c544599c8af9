mod builtin;
mod csv_files;

pub use builtin::builtin_catalog;
pub use csv_files::{CsvLenderStore, PRODUCTION_CATALOG_FILE, TEST_CATALOG_FILE};

use std::path::PathBuf;
use std::sync::Arc;

use super::domain::{LenderConfig, RuleSet};

/// Source of lender configuration snapshots. Implementations return only enabled lenders,
/// in catalog order.
pub trait LenderConfigStore: Send + Sync {
    fn list_lenders(&self, rule_set: RuleSet) -> Result<Vec<LenderConfig>, StoreError>;
}

impl<T: LenderConfigStore + ?Sized> LenderConfigStore for Arc<T> {
    fn list_lenders(&self, rule_set: RuleSet) -> Result<Vec<LenderConfig>, StoreError> {
        (**self).list_lenders(rule_set)
    }
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("lender catalog unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read lender catalog {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },
}

/// Fixed in-memory catalogs.
#[derive(Debug, Clone, Default)]
pub struct StaticLenderStore {
    production: Vec<LenderConfig>,
    test: Vec<LenderConfig>,
}

impl StaticLenderStore {
    pub fn new(production: Vec<LenderConfig>, test: Vec<LenderConfig>) -> Self {
        Self { production, test }
    }

    pub fn builtin() -> Self {
        Self::new(
            builtin_catalog(RuleSet::Production),
            builtin_catalog(RuleSet::Test),
        )
    }
}

impl LenderConfigStore for StaticLenderStore {
    fn list_lenders(&self, rule_set: RuleSet) -> Result<Vec<LenderConfig>, StoreError> {
        let lenders = match rule_set {
            RuleSet::Production => &self.production,
            RuleSet::Test => &self.test,
        };
        Ok(lenders
            .iter()
            .filter(|lender| lender.enabled)
            .cloned()
            .collect())
    }
}
