use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, info_span, warn};

use super::domain::{LenderConfig, LenderEstimate, RuleSet};
use super::engine::{unique_by_name, EstimateEngine};
use super::limit::round_half_up;
use super::ranking::resolve_ranks;
use super::request::{EstimateQuery, EstimateRequest, RequestError};
use super::store::{LenderConfigStore, StoreError};
use super::visa::normalize_visa_type;

/// Response body for a loan estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateResponse {
    pub banks: Vec<LenderEstimate>,
}

/// Read-only view of one catalog entry for the lender listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderSummary {
    pub bank_name: String,
    pub rank: i32,
    pub estimated_rate: Option<Decimal>,
    pub max_limit: Decimal,
    pub weight_factor: Decimal,
    pub allowed_visa_codes: Vec<String>,
}

impl LenderSummary {
    fn from_config(lender: &LenderConfig, rank: i32) -> Self {
        Self {
            bank_name: lender.name.clone(),
            rank,
            estimated_rate: lender.estimated_rate.map(|rate| round_half_up(rate, 2)),
            max_limit: lender.max_limit,
            weight_factor: lender.weight_factor,
            allowed_visa_codes: lender
                .allowed_visa_codes
                .iter()
                .map(|code| normalize_visa_type(code))
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }
}

/// Service composing the lender catalog and the estimate engine.
pub struct LoanEstimateService<S> {
    store: Arc<S>,
    engine: Arc<EstimateEngine>,
}

impl<S> LoanEstimateService<S>
where
    S: LenderConfigStore + 'static,
{
    pub fn new(store: Arc<S>, engine: EstimateEngine) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
        }
    }

    /// Validate a raw request and estimate it.
    pub fn estimate(
        &self,
        request: EstimateRequest,
    ) -> Result<EstimateResponse, EstimateServiceError> {
        let query = request.into_query()?;
        Ok(self.estimate_query(&query))
    }

    /// Estimate an already validated request. Never fails: an unavailable catalog yields
    /// an empty lender list.
    pub fn estimate_query(&self, query: &EstimateQuery) -> EstimateResponse {
        let span = info_span!(
            "loan_estimate",
            login_id = %query.login_id,
            rule_set = query.rule_set.label()
        );
        let _entered = span.enter();

        let lenders = self.load_lenders(query.rule_set);
        let banks = self.engine.estimate(&query.profile, lenders);
        let eligible = banks.iter().filter(|bank| bank.is_eligible()).count();
        info!(lenders = banks.len(), eligible, "loan estimate computed");

        EstimateResponse { banks }
    }

    /// Catalog listing with resolved ranks, in catalog order. Ranks match those of an
    /// estimate over the same catalog.
    pub fn lenders(&self, rule_set: RuleSet) -> Vec<LenderSummary> {
        self.lender_listing(rule_set).lenders
    }

    /// Listing plus where it came from; an unavailable catalog lists nothing.
    pub fn lender_listing(&self, rule_set: RuleSet) -> LenderListing {
        let (lenders, source) = match self.store.list_lenders(rule_set) {
            Ok(lenders) => (unique_by_name(lenders), DataSource::Catalog),
            Err(err) => {
                catalog_unavailable(rule_set, &err);
                (Vec::new(), DataSource::Fallback)
            }
        };
        let ranks = resolve_ranks(&lenders);
        let lenders = lenders
            .iter()
            .zip(ranks)
            .map(|(lender, rank)| LenderSummary::from_config(lender, rank))
            .collect();
        LenderListing { lenders, source }
    }

    fn load_lenders(&self, rule_set: RuleSet) -> Vec<LenderConfig> {
        self.store.list_lenders(rule_set).unwrap_or_else(|err| {
            catalog_unavailable(rule_set, &err);
            Vec::new()
        })
    }
}

fn catalog_unavailable(rule_set: RuleSet, err: &StoreError) {
    warn!(
        %rule_set,
        error = %err,
        "lender catalog unavailable; continuing with no lenders"
    );
}

/// Whether a lender listing was read from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Catalog,
    Fallback,
}

impl DataSource {
    pub fn header_value(&self) -> &'static str {
        match self {
            DataSource::Catalog => "catalog",
            DataSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenderListing {
    pub lenders: Vec<LenderSummary>,
    pub source: DataSource,
}

/// Error raised by the estimate service.
#[derive(Debug, thiserror::Error)]
pub enum EstimateServiceError {
    #[error(transparent)]
    Request(#[from] RequestError),
}
