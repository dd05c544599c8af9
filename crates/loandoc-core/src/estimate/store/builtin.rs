use rust_decimal_macros::dec;

use super::super::domain::{LenderConfig, RuleSet};

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Catalog shipped with the service, used when no catalog directory is configured.
pub fn builtin_catalog(rule_set: RuleSet) -> Vec<LenderConfig> {
    match rule_set {
        RuleSet::Production => production(),
        RuleSet::Test => test(),
    }
}

fn production() -> Vec<LenderConfig> {
    let kb = LenderConfig {
        rank: Some(1),
        allowed_visa_codes: codes(&["E-7", "E-9", "F-2", "F-6", "F-5"]),
        required_countries: Some(codes(&["Nepal", "Cambodia"])),
        min_age: 19,
        min_remaining_stay_months: 8,
        min_employment_months: 3,
        min_annual_income: dec!(1500),
        estimated_rate: Some(dec!(14.7)),
        ..LenderConfig::new("KB저축은행", dec!(0.35), dec!(3000))
    };

    let jeonbuk = LenderConfig {
        allowed_visa_codes: codes(&["E-7", "E-9", "F-2", "F-6", "F-5", "F-4"]),
        min_age: 19,
        min_remaining_stay_months: 6,
        min_employment_months: 6,
        min_annual_income: dec!(2000),
        estimated_rate: Some(dec!(13.07)),
        ..LenderConfig::new("전북은행", dec!(0.36), dec!(5000))
    };

    let ok = LenderConfig {
        allowed_visa_codes: codes(&["E-9"]),
        min_age: 18,
        max_age: Some(45),
        estimated_rate: Some(dec!(15.0)),
        ..LenderConfig::new("OK저축은행", dec!(0.37), dec!(3500))
    };

    let welcome = LenderConfig {
        allowed_visa_codes: codes(&["E-9", "E-7"]),
        min_remaining_stay_months: 1,
        estimated_rate: Some(dec!(16.0)),
        ..LenderConfig::new("웰컴저축은행", dec!(0.36), dec!(3000))
    };

    // No published rate, so it derives the last rank.
    let yegaram = LenderConfig {
        allowed_visa_codes: codes(&["E-7", "E-9", "F-2", "F-6", "F-5"]),
        min_age: 20,
        ..LenderConfig::new("예가람저축은행", dec!(0.38), dec!(4000))
    };

    vec![kb, jeonbuk, ok, welcome, yegaram]
}

fn test() -> Vec<LenderConfig> {
    vec![LenderConfig {
        rank: Some(1),
        allowed_visa_codes: codes(&["E-7", "E-9", "F-2", "F-4", "F-5", "F-6", "H-2"]),
        estimated_rate: Some(dec!(10.00)),
        response_latency_ms: Some(0),
        ..LenderConfig::new("테스트은행1", dec!(0.10), dec!(1000))
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::ranking::resolve_ranks;
    use std::collections::HashSet;

    #[test]
    fn production_names_are_unique() {
        let catalog = builtin_catalog(RuleSet::Production);
        let names: HashSet<_> = catalog.iter().map(|lender| lender.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn production_ranks_resolve_in_display_order() {
        let catalog = builtin_catalog(RuleSet::Production);
        assert_eq!(resolve_ranks(&catalog), vec![1, 2, 3, 4, 5]);
    }
}
