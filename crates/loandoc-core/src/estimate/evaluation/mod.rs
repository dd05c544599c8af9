mod overrides;
mod rules;

pub use overrides::{
    HealthInsuranceRule, LenderOverrides, MissingInsurance, OverrideRegistry,
    VisaCountryExclusion, VisaGatedMinimum, VisaWhitelist,
};

use super::domain::{ApplicantProfile, CriteriaReport, LenderConfig};
use super::visa::normalize_visa_type;
use overrides::NO_OVERRIDES;

/// Profile plus the values derived from it once per request.
#[derive(Debug, Clone)]
pub struct Applicant<'a> {
    profile: &'a ApplicantProfile,
    visa_code: String,
    folded_nationality: String,
}

impl<'a> Applicant<'a> {
    pub fn new(profile: &'a ApplicantProfile) -> Self {
        Self {
            profile,
            visa_code: normalize_visa_type(&profile.visa_type),
            folded_nationality: profile.nationality.trim().to_lowercase(),
        }
    }

    pub fn profile(&self) -> &ApplicantProfile {
        self.profile
    }

    pub fn visa_code(&self) -> &str {
        &self.visa_code
    }

    pub fn is_from(&self, country_token: &str) -> bool {
        rules::nationality_matches(&self.folded_nationality, country_token)
    }
}

/// Applies the generic criteria and then any lender override, reporting every criterion.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEvaluator {
    overrides: OverrideRegistry,
}

impl EligibilityEvaluator {
    pub fn new(overrides: OverrideRegistry) -> Self {
        Self { overrides }
    }

    pub fn standard() -> Self {
        Self::new(OverrideRegistry::standard())
    }

    pub fn evaluate(&self, applicant: &Applicant<'_>, lender: &LenderConfig) -> CriteriaReport {
        let policy = self
            .overrides
            .for_lender(&lender.name)
            .unwrap_or(&NO_OVERRIDES);

        CriteriaReport {
            visa_type: policy.visa_type(applicant, rules::visa_type(applicant, lender)),
            country: policy.country(applicant, rules::country(applicant, lender)),
            age: rules::age(applicant, lender),
            visa_expiry: rules::remaining_stay(applicant, lender),
            employment_date: policy.employment(applicant, rules::employment(applicant, lender)),
            annual_income: policy.annual_income(applicant, rules::annual_income(applicant, lender)),
            health_insurance: policy.health_insurance(applicant),
        }
    }
}
