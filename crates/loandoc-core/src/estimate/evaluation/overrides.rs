//! Lender-specific exceptions layered over the generic criterion rules.
//!
//! Each lender may carry one strategy per criterion. A strategy receives the generic outcome
//! and returns the final one, so the generic rules stay free of lender names.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::super::domain::{CriterionCheck, ErrorCode};
use super::super::visa::{accepts_visa, normalize_visa_type};
use super::Applicant;

/// Replaces the configured visa list with a fixed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisaWhitelist {
    codes: Vec<String>,
}

impl VisaWhitelist {
    pub fn only(code: &str) -> Self {
        Self::of(&[code])
    }

    pub fn of(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|code| normalize_visa_type(code)).collect(),
        }
    }

    fn apply(&self, applicant: &Applicant<'_>) -> CriterionCheck {
        CriterionCheck::from_outcome(
            accepts_visa(&self.codes, applicant.visa_code()),
            ErrorCode::VisaType,
        )
    }
}

/// Rejects one visa code when held by any of the listed nationalities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisaCountryExclusion {
    visa_code: String,
    countries: Vec<String>,
}

impl VisaCountryExclusion {
    pub fn new(visa_code: &str, countries: &[&str]) -> Self {
        Self {
            visa_code: normalize_visa_type(visa_code),
            countries: countries.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn triggered_by(&self, applicant: &Applicant<'_>) -> bool {
        !self.visa_code.is_empty()
            && applicant.visa_code() == self.visa_code
            && self.countries.iter().any(|country| applicant.is_from(country))
    }
}

/// A minimum that only applies to the listed visa codes; every other visa passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisaGatedMinimum<T> {
    visa_codes: Vec<String>,
    minimum: T,
}

impl<T: PartialOrd> VisaGatedMinimum<T> {
    pub fn new(visa_codes: &[&str], minimum: T) -> Self {
        Self {
            visa_codes: visa_codes
                .iter()
                .map(|code| normalize_visa_type(code))
                .collect(),
            minimum,
        }
    }

    fn satisfied(&self, applicant: &Applicant<'_>, value: &T) -> bool {
        if accepts_visa(&self.visa_codes, applicant.visa_code()) {
            *value >= self.minimum
        } else {
            true
        }
    }
}

/// How an absent health-insurance type is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInsurance {
    Pass,
    Fail,
}

/// Health-insurance screen: fails only for the excluded category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthInsuranceRule {
    excluded_category: String,
    missing: MissingInsurance,
}

impl HealthInsuranceRule {
    pub fn excluding(category: &str, missing: MissingInsurance) -> Self {
        Self {
            excluded_category: category.trim().to_string(),
            missing,
        }
    }

    fn apply(&self, applicant: &Applicant<'_>) -> CriterionCheck {
        let valid = match applicant.profile().health_insurance_type.as_deref() {
            Some(kind) => kind.trim() != self.excluded_category,
            None => self.missing == MissingInsurance::Pass,
        };
        CriterionCheck::from_outcome(valid, ErrorCode::HealthInsurance)
    }
}

/// Per-criterion strategies for one lender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LenderOverrides {
    pub visa: Option<VisaWhitelist>,
    pub country: Vec<VisaCountryExclusion>,
    pub employment: Option<VisaGatedMinimum<u32>>,
    pub income: Option<VisaGatedMinimum<Decimal>>,
    pub health_insurance: Option<HealthInsuranceRule>,
}

pub(crate) static NO_OVERRIDES: LenderOverrides = LenderOverrides {
    visa: None,
    country: Vec::new(),
    employment: None,
    income: None,
    health_insurance: None,
};

impl LenderOverrides {
    pub(crate) fn visa_type(
        &self,
        applicant: &Applicant<'_>,
        generic: CriterionCheck,
    ) -> CriterionCheck {
        match &self.visa {
            Some(whitelist) => whitelist.apply(applicant),
            None => generic,
        }
    }

    pub(crate) fn country(
        &self,
        applicant: &Applicant<'_>,
        generic: CriterionCheck,
    ) -> CriterionCheck {
        if self
            .country
            .iter()
            .any(|exclusion| exclusion.triggered_by(applicant))
        {
            CriterionCheck::fail(ErrorCode::VisaCountry)
        } else {
            generic
        }
    }

    pub(crate) fn employment(
        &self,
        applicant: &Applicant<'_>,
        generic: CriterionCheck,
    ) -> CriterionCheck {
        match &self.employment {
            Some(rule) => CriterionCheck::from_outcome(
                rule.satisfied(applicant, &applicant.profile().employment_months),
                ErrorCode::EmploymentDate,
            ),
            None => generic,
        }
    }

    pub(crate) fn annual_income(
        &self,
        applicant: &Applicant<'_>,
        generic: CriterionCheck,
    ) -> CriterionCheck {
        match &self.income {
            Some(rule) => CriterionCheck::from_outcome(
                rule.satisfied(applicant, &applicant.profile().annual_income),
                ErrorCode::AnnualIncome,
            ),
            None => generic,
        }
    }

    pub(crate) fn health_insurance(&self, applicant: &Applicant<'_>) -> Option<CriterionCheck> {
        self.health_insurance
            .as_ref()
            .map(|rule| rule.apply(applicant))
    }
}

/// Lender name → override strategies.
#[derive(Debug, Clone, Default)]
pub struct OverrideRegistry {
    by_lender: HashMap<String, LenderOverrides>,
}

impl OverrideRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Exceptions currently agreed with the partner lenders.
    pub fn standard() -> Self {
        Self::empty()
            .with(
                "KB저축은행",
                LenderOverrides {
                    visa: Some(VisaWhitelist::of(&["E-7", "E-9", "F-2", "F-5", "F-6"])),
                    health_insurance: Some(HealthInsuranceRule::excluding(
                        "지역",
                        MissingInsurance::Pass,
                    )),
                    ..LenderOverrides::default()
                },
            )
            .with(
                "OK저축은행",
                LenderOverrides {
                    visa: Some(VisaWhitelist::only("E-9")),
                    ..LenderOverrides::default()
                },
            )
            .with(
                "전북은행",
                LenderOverrides {
                    employment: Some(VisaGatedMinimum::new(&["E-9", "E-7"], 1)),
                    income: Some(VisaGatedMinimum::new(&["E-9"], dec!(1500))),
                    ..LenderOverrides::default()
                },
            )
            .with(
                "웰컴저축은행",
                LenderOverrides {
                    country: vec![
                        VisaCountryExclusion::new("E-9", &["Uzbekistan", "Kyrgyzstan"]),
                        VisaCountryExclusion::new("E-7", &["Vietnam"]),
                    ],
                    ..LenderOverrides::default()
                },
            )
    }

    pub fn with(mut self, lender: impl Into<String>, overrides: LenderOverrides) -> Self {
        self.by_lender.insert(lender.into(), overrides);
        self
    }

    pub fn for_lender(&self, lender: &str) -> Option<&LenderOverrides> {
        self.by_lender.get(lender)
    }
}
