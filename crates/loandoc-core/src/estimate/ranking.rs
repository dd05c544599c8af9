use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::domain::{LenderConfig, LenderEstimate};

/// Sort position for a lender whose rank was never resolved.
pub const UNRANKED: i32 = 999;

/// Fills in every missing rank.
///
/// Phase one splits lenders into fixed and derived groups. Phase two numbers the derived
/// group by ascending estimated rate, starting right after the highest fixed rank (or at 2
/// when no fixed rank is above 1). Lenders without a rate follow the rated ones; ties keep
/// catalog order. The result is indexed like `lenders`.
pub fn resolve_ranks(lenders: &[LenderConfig]) -> Vec<i32> {
    let (fixed, mut derived) = partition_ranks(lenders);

    let highest_fixed = fixed.iter().map(|(_, rank)| *rank).max().unwrap_or(1).max(1);
    derived.sort_by(|(left_index, left_rate), (right_index, right_rate)| {
        compare_rates(*left_rate, *right_rate).then(left_index.cmp(right_index))
    });

    let mut resolved = vec![UNRANKED; lenders.len()];
    for (index, rank) in fixed {
        resolved[index] = rank;
    }
    let mut next = highest_fixed.saturating_add(1);
    for (index, _) in derived {
        resolved[index] = next;
        next = next.saturating_add(1);
    }
    resolved
}

type FixedRank = (usize, i32);
type DerivedRank = (usize, Option<Decimal>);

fn partition_ranks(lenders: &[LenderConfig]) -> (Vec<FixedRank>, Vec<DerivedRank>) {
    let mut fixed = Vec::new();
    let mut derived = Vec::new();
    for (index, lender) in lenders.iter().enumerate() {
        match lender.rank {
            Some(rank) => fixed.push((index, rank)),
            None => derived.push((index, lender.estimated_rate)),
        }
    }
    (fixed, derived)
}

fn compare_rates(left: Option<Decimal>, right: Option<Decimal>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders estimates by rank, then measured latency; the sort is stable so input order
/// settles anything left. Eligibility plays no part.
pub fn rank(mut estimates: Vec<LenderEstimate>) -> Vec<LenderEstimate> {
    estimates.sort_by_key(sort_key);
    estimates
}

fn sort_key(estimate: &LenderEstimate) -> (i32, (u8, u64)) {
    (
        estimate.rank.unwrap_or(UNRANKED),
        estimate.latency.tiebreak_key(),
    )
}
