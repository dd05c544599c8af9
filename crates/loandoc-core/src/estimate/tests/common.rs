use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::estimate::domain::{ApplicantProfile, LenderConfig, RuleSet};
use crate::estimate::engine::EstimateEngine;
use crate::estimate::evaluation::{Applicant, EligibilityEvaluator};
use crate::estimate::request::{EstimateRequest, RawField};
use crate::estimate::service::LoanEstimateService;
use crate::estimate::store::{LenderConfigStore, StaticLenderStore, StoreError};
use crate::estimate::CriteriaReport;

pub(super) fn profile() -> ApplicantProfile {
    ApplicantProfile {
        nationality: "Nepal".to_string(),
        remaining_stay_months: 20,
        annual_income: dec!(2500),
        age: 25,
        employment_months: 10,
        visa_type: "E-9".to_string(),
        health_insurance_type: None,
    }
}

pub(super) fn scenario_lender() -> LenderConfig {
    LenderConfig {
        allowed_visa_codes: vec!["E9".to_string()],
        required_countries: Some(vec!["Nepal".to_string(), "Cambodia".to_string()]),
        min_age: 19,
        min_remaining_stay_months: 8,
        min_annual_income: dec!(1500),
        estimated_rate: Some(dec!(12.5)),
        ..LenderConfig::new("한빛저축은행", dec!(0.35), dec!(3000))
    }
}

pub(super) fn named_lender(name: &str, visas: &[&str]) -> LenderConfig {
    LenderConfig {
        allowed_visa_codes: visas.iter().map(|visa| visa.to_string()).collect(),
        ..LenderConfig::new(name, dec!(0.36), dec!(5000))
    }
}

pub(super) fn rated_lender(name: &str, rank: Option<i32>, rate: Option<Decimal>) -> LenderConfig {
    LenderConfig {
        rank,
        estimated_rate: rate,
        ..named_lender(name, &["E-9"])
    }
}

pub(super) fn evaluate(lender: &LenderConfig, profile: &ApplicantProfile) -> CriteriaReport {
    let evaluator = EligibilityEvaluator::standard();
    evaluator.evaluate(&Applicant::new(profile), lender)
}

pub(super) fn sequential_engine() -> EstimateEngine {
    EstimateEngine::new(EligibilityEvaluator::standard(), false)
}

pub(super) fn parallel_engine() -> EstimateEngine {
    EstimateEngine::new(EligibilityEvaluator::standard(), true)
}

pub(super) fn request() -> EstimateRequest {
    EstimateRequest {
        login_id: Some(RawField::from("worker01")),
        nationality: Some(RawField::from("Nepal")),
        remain_months: Some(RawField::from(20)),
        annual_income: Some(RawField::from(2500)),
        age: Some(RawField::from(25)),
        working_months: Some(RawField::from(10)),
        visa_type: Some(RawField::from("E-9")),
        health_insurance: Some("직장".to_string()),
        test_mode: None,
    }
}

pub(super) struct UnavailableStore;

impl LenderConfigStore for UnavailableStore {
    fn list_lenders(&self, _rule_set: RuleSet) -> Result<Vec<LenderConfig>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn builtin_service() -> Arc<LoanEstimateService<StaticLenderStore>> {
    Arc::new(LoanEstimateService::new(
        Arc::new(StaticLenderStore::builtin()),
        sequential_engine(),
    ))
}

pub(super) fn service_with(
    production: Vec<LenderConfig>,
) -> Arc<LoanEstimateService<StaticLenderStore>> {
    Arc::new(LoanEstimateService::new(
        Arc::new(StaticLenderStore::new(production, Vec::new())),
        parallel_engine(),
    ))
}

pub(super) fn unavailable_service() -> Arc<LoanEstimateService<UnavailableStore>> {
    Arc::new(LoanEstimateService::new(
        Arc::new(UnavailableStore),
        sequential_engine(),
    ))
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
