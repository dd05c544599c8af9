use rust_decimal::Decimal;

use super::domain::{CriteriaReport, LenderConfig, LenderEstimate};
use super::limit::round_half_up;

/// Builds the wire record for one lender from its evaluation, limit and resolved rank.
pub fn assemble(
    lender: &LenderConfig,
    criteria: CriteriaReport,
    estimated_limit: Decimal,
    rank: i32,
) -> LenderEstimate {
    LenderEstimate {
        bank_name: lender.name.clone(),
        criteria,
        estimated_limit,
        estimated_rate: lender.estimated_rate.map(|rate| round_half_up(rate, 2)),
        rank: Some(rank),
        response_latency_ms: lender.response_latency_ms,
        latency: lender.latency(),
    }
}
