use std::fmt;

use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Which lender catalog a request is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    #[default]
    Production,
    Test,
}

impl RuleSet {
    pub fn from_test_mode(test_mode: bool) -> Self {
        if test_mode {
            Self::Test
        } else {
            Self::Production
        }
    }

    /// Parses the `mode` query parameter; anything other than `test` is production.
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some(value) if value.trim().eq_ignore_ascii_case("test") => Self::Test,
            _ => Self::Production,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RuleSet::Production => "production",
            RuleSet::Test => "test",
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Applicant snapshot for one estimate request. Income is in 만원.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub nationality: String,
    pub remaining_stay_months: u32,
    pub annual_income: Decimal,
    pub age: i32,
    pub employment_months: u32,
    pub visa_type: String,
    pub health_insurance_type: Option<String>,
}

/// Eligibility and limit settings for one lender, as supplied by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderConfig {
    pub name: String,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default)]
    pub allowed_visa_codes: Vec<String>,
    #[serde(default)]
    pub excluded_countries: Option<Vec<String>>,
    #[serde(default)]
    pub required_countries: Option<Vec<String>>,
    #[serde(default)]
    pub min_age: i32,
    #[serde(default)]
    pub max_age: Option<i32>,
    #[serde(default)]
    pub min_remaining_stay_months: u32,
    #[serde(default)]
    pub min_employment_months: u32,
    #[serde(default)]
    pub min_annual_income: Decimal,
    pub weight_factor: Decimal,
    pub max_limit: Decimal,
    #[serde(default)]
    pub estimated_rate: Option<Decimal>,
    #[serde(default)]
    pub response_latency_ms: Option<i64>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl LenderConfig {
    /// A lender with no eligibility restrictions beyond the limit parameters.
    pub fn new(name: impl Into<String>, weight_factor: Decimal, max_limit: Decimal) -> Self {
        Self {
            name: name.into(),
            rank: None,
            allowed_visa_codes: Vec::new(),
            excluded_countries: None,
            required_countries: None,
            min_age: 0,
            max_age: None,
            min_remaining_stay_months: 0,
            min_employment_months: 0,
            min_annual_income: Decimal::ZERO,
            weight_factor,
            max_limit,
            estimated_rate: None,
            response_latency_ms: None,
            enabled: true,
        }
    }

    pub fn latency(&self) -> ResponseLatency {
        ResponseLatency::from_raw(self.response_latency_ms)
    }
}

/// Responsiveness of a lender integration, used as the secondary ordering signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseLatency {
    Known(u64),
    Unknown,
    Down,
}

impl ResponseLatency {
    /// Negative raw values are the outage sentinel written by the integration monitor.
    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            None => Self::Unknown,
            Some(ms) if ms < 0 => Self::Down,
            Some(ms) => Self::Known(ms.unsigned_abs()),
        }
    }

    /// Unknown and down lenders share one bucket behind every measured latency.
    pub fn tiebreak_key(&self) -> (u8, u64) {
        match self {
            ResponseLatency::Known(ms) => (0, *ms),
            ResponseLatency::Unknown | ResponseLatency::Down => (1, 0),
        }
    }
}

/// Individual eligibility checks reported for every lender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Criterion {
    VisaType,
    Country,
    Age,
    VisaExpiry,
    EmploymentDate,
    AnnualIncome,
    HealthInsurance,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::VisaType,
        Criterion::Country,
        Criterion::Age,
        Criterion::VisaExpiry,
        Criterion::EmploymentDate,
        Criterion::AnnualIncome,
        Criterion::HealthInsurance,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            Criterion::VisaType => "visaType",
            Criterion::Country => "country",
            Criterion::Age => "age",
            Criterion::VisaExpiry => "visaExpiry",
            Criterion::EmploymentDate => "employmentDate",
            Criterion::AnnualIncome => "annualIncome",
            Criterion::HealthInsurance => "healthInsurance",
        }
    }
}

/// Failure codes shown to applicants; the wire strings are consumed by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    VisaType,
    Country,
    VisaCountry,
    Age,
    VisaExpiry,
    EmploymentDate,
    AnnualIncome,
    HealthInsurance,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::VisaType => "E비자종류",
            ErrorCode::Country => "E국가",
            ErrorCode::VisaCountry => "E비자국가",
            ErrorCode::Age => "E나이",
            ErrorCode::VisaExpiry => "E비자만료",
            ErrorCode::EmploymentDate => "E재직일자",
            ErrorCode::AnnualIncome => "E연소득",
            ErrorCode::HealthInsurance => "E의료보험",
        }
    }
}

/// Pass/fail detail for one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionCheck {
    pub valid: bool,
    pub error: Option<ErrorCode>,
}

impl CriterionCheck {
    pub fn pass() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn fail(code: ErrorCode) -> Self {
        Self {
            valid: false,
            error: Some(code),
        }
    }

    pub fn from_outcome(valid: bool, code: ErrorCode) -> Self {
        if valid {
            Self::pass()
        } else {
            Self::fail(code)
        }
    }
}

impl Serialize for CriterionCheck {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CriterionCheck", 2)?;
        state.serialize_field("valid", &self.valid)?;
        state.serialize_field("error", self.error.map(|code| code.code()).unwrap_or(""))?;
        state.end()
    }
}

/// Every criterion outcome for one lender. Health insurance is present only for lenders
/// that screen on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaReport {
    pub visa_type: CriterionCheck,
    pub country: CriterionCheck,
    pub age: CriterionCheck,
    pub visa_expiry: CriterionCheck,
    pub employment_date: CriterionCheck,
    pub annual_income: CriterionCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_insurance: Option<CriterionCheck>,
}

impl CriteriaReport {
    pub fn get(&self, criterion: Criterion) -> Option<&CriterionCheck> {
        match criterion {
            Criterion::VisaType => Some(&self.visa_type),
            Criterion::Country => Some(&self.country),
            Criterion::Age => Some(&self.age),
            Criterion::VisaExpiry => Some(&self.visa_expiry),
            Criterion::EmploymentDate => Some(&self.employment_date),
            Criterion::AnnualIncome => Some(&self.annual_income),
            Criterion::HealthInsurance => self.health_insurance.as_ref(),
        }
    }

    pub fn is_eligible(&self) -> bool {
        Criterion::ALL
            .iter()
            .filter_map(|criterion| self.get(*criterion))
            .all(|check| check.valid)
    }

    pub fn failures(&self) -> Vec<(Criterion, ErrorCode)> {
        Criterion::ALL
            .iter()
            .filter_map(|criterion| {
                self.get(*criterion)
                    .and_then(|check| check.error)
                    .map(|code| (*criterion, code))
            })
            .collect()
    }
}

/// Final per-lender record returned in the `banks` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderEstimate {
    pub bank_name: String,
    #[serde(flatten)]
    pub criteria: CriteriaReport,
    pub estimated_limit: Decimal,
    pub estimated_rate: Option<Decimal>,
    pub rank: Option<i32>,
    pub response_latency_ms: Option<i64>,
    #[serde(skip)]
    pub latency: ResponseLatency,
}

impl LenderEstimate {
    pub fn is_eligible(&self) -> bool {
        self.criteria.is_eligible()
    }
}
