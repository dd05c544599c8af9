//! Multi-lender loan estimate: visa normalization, per-lender eligibility screening with
//! lender-specific overrides, credit-limit calculation, rank resolution and ordering.
//!
//! [`LoanEstimateService`] is the entry point; [`estimate_router`] exposes it over HTTP.

pub mod assembler;
pub mod domain;
pub mod engine;
pub mod evaluation;
pub mod limit;
pub mod ranking;
pub mod request;
pub mod router;
pub mod service;
pub mod store;
pub mod visa;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantProfile, CriteriaReport, Criterion, CriterionCheck, ErrorCode, LenderConfig,
    LenderEstimate, ResponseLatency, RuleSet,
};
pub use engine::{EstimateEngine, FaultCause, LenderFault};
pub use evaluation::{Applicant, EligibilityEvaluator, OverrideRegistry};
pub use request::{EstimateQuery, EstimateRequest, RawField, RequestError};
pub use router::estimate_router;
pub use service::{
    DataSource, EstimateResponse, EstimateServiceError, LenderListing, LenderSummary,
    LoanEstimateService,
};
pub use store::{CsvLenderStore, LenderConfigStore, StaticLenderStore, StoreError};
pub use visa::normalize_visa_type;
