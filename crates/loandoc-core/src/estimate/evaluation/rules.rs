use super::super::domain::{CriterionCheck, ErrorCode, LenderConfig};
use super::super::visa::accepts_visa;
use super::Applicant;

pub(crate) fn visa_type(applicant: &Applicant<'_>, lender: &LenderConfig) -> CriterionCheck {
    let valid = accepts_visa(&lender.allowed_visa_codes, applicant.visa_code());
    CriterionCheck::from_outcome(valid, ErrorCode::VisaType)
}

pub(crate) fn country(applicant: &Applicant<'_>, lender: &LenderConfig) -> CriterionCheck {
    let mut valid = true;

    if let Some(excluded) = &lender.excluded_countries {
        if excluded.iter().any(|token| applicant.is_from(token)) {
            valid = false;
        }
    }

    if let Some(required) = &lender.required_countries {
        if !required.iter().any(|token| applicant.is_from(token)) {
            valid = false;
        }
    }

    CriterionCheck::from_outcome(valid, ErrorCode::Country)
}

pub(crate) fn age(applicant: &Applicant<'_>, lender: &LenderConfig) -> CriterionCheck {
    let age = applicant.profile().age;
    let valid = age >= lender.min_age && lender.max_age.map_or(true, |max| age <= max);
    CriterionCheck::from_outcome(valid, ErrorCode::Age)
}

pub(crate) fn remaining_stay(applicant: &Applicant<'_>, lender: &LenderConfig) -> CriterionCheck {
    let valid = applicant.profile().remaining_stay_months >= lender.min_remaining_stay_months;
    CriterionCheck::from_outcome(valid, ErrorCode::VisaExpiry)
}

pub(crate) fn employment(applicant: &Applicant<'_>, lender: &LenderConfig) -> CriterionCheck {
    let valid = applicant.profile().employment_months >= lender.min_employment_months;
    CriterionCheck::from_outcome(valid, ErrorCode::EmploymentDate)
}

pub(crate) fn annual_income(applicant: &Applicant<'_>, lender: &LenderConfig) -> CriterionCheck {
    let valid = applicant.profile().annual_income >= lender.min_annual_income;
    CriterionCheck::from_outcome(valid, ErrorCode::AnnualIncome)
}

/// Case-insensitive substring match of a free-text nationality against a country token.
/// Blank tokens never match.
pub(crate) fn nationality_matches(folded_nationality: &str, token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    folded_nationality.contains(&token.to_lowercase())
}
