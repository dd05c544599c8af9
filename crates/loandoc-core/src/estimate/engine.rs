use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::assembler::assemble;
use super::domain::{ApplicantProfile, LenderConfig, LenderEstimate};
use super::evaluation::{Applicant, EligibilityEvaluator};
use super::limit::{compute_limit, LimitError};
use super::ranking::{rank, resolve_ranks};

/// A lender that could not be estimated; it is left out of the result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lender `{lender}` skipped: {source}")]
pub struct LenderFault {
    pub lender: String,
    #[source]
    pub source: FaultCause,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultCause {
    #[error(transparent)]
    Limit(#[from] LimitError),
    #[error("evaluation panicked: {0}")]
    Panicked(String),
}

/// Runs the whole per-request pipeline over a lender snapshot.
#[derive(Debug, Clone)]
pub struct EstimateEngine {
    evaluator: EligibilityEvaluator,
    parallel: bool,
}

impl Default for EstimateEngine {
    fn default() -> Self {
        Self::new(EligibilityEvaluator::standard(), true)
    }
}

impl EstimateEngine {
    pub fn new(evaluator: EligibilityEvaluator, parallel: bool) -> Self {
        Self {
            evaluator,
            parallel,
        }
    }

    /// Evaluates, limits, ranks and orders every usable lender for one applicant.
    pub fn estimate(
        &self,
        profile: &ApplicantProfile,
        lenders: Vec<LenderConfig>,
    ) -> Vec<LenderEstimate> {
        let lenders = unique_by_name(lenders);
        let ranks = resolve_ranks(&lenders);
        let applicant = Applicant::new(profile);
        debug!(
            visa_code = applicant.visa_code(),
            lenders = lenders.len(),
            "evaluating lenders"
        );

        let outcomes: Vec<Result<LenderEstimate, LenderFault>> = if self.parallel {
            lenders
                .par_iter()
                .zip(ranks.par_iter())
                .map(|(lender, rank)| self.estimate_lender(&applicant, lender, *rank))
                .collect()
        } else {
            lenders
                .iter()
                .zip(ranks.iter())
                .map(|(lender, rank)| self.estimate_lender(&applicant, lender, *rank))
                .collect()
        };

        let estimates = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(estimate) => Some(estimate),
                Err(fault) => {
                    warn!(
                        lender = %fault.lender,
                        error = %fault.source,
                        "dropping lender from estimate"
                    );
                    None
                }
            })
            .collect();

        rank(estimates)
    }

    fn estimate_lender(
        &self,
        applicant: &Applicant<'_>,
        lender: &LenderConfig,
        rank: i32,
    ) -> Result<LenderEstimate, LenderFault> {
        isolated(&lender.name, || {
            let criteria = self.evaluator.evaluate(applicant, lender);
            let limit = compute_limit(applicant.profile(), lender)?;
            Ok(assemble(lender, criteria, limit, rank))
        })
    }
}

/// Runs one lender's work so that neither an error nor a panic reaches the other lenders.
fn isolated<F>(lender: &str, work: F) -> Result<LenderEstimate, LenderFault>
where
    F: FnOnce() -> Result<LenderEstimate, FaultCause>,
{
    let outcome = match catch_unwind(AssertUnwindSafe(work)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(FaultCause::Panicked(panic_message(payload.as_ref()))),
    };
    outcome.map_err(|source| LenderFault {
        lender: lender.to_string(),
        source,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Keeps the first lender of each name, in catalog order.
pub(crate) fn unique_by_name(lenders: Vec<LenderConfig>) -> Vec<LenderConfig> {
    let mut seen = HashSet::new();
    lenders
        .into_iter()
        .filter(|lender| {
            let first = seen.insert(lender.name.clone());
            if !first {
                warn!(
                    lender = %lender.name,
                    "duplicate lender name in catalog; keeping the first entry"
                );
            }
            first
        })
        .collect()
}
