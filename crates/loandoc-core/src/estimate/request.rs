use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, RuleSet};

pub const MISSING_FIELDS_MESSAGE: &str = "모든 필드가 필요합니다";
pub const MALFORMED_BODY_MESSAGE: &str = "잘못된 JSON 본문입니다.";

/// A scalar request field. Clients send numbers both as JSON numbers and as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(serde_json::Number),
    Text(String),
}

impl RawField {
    fn text(&self) -> String {
        match self {
            RawField::Number(number) => number.to_string(),
            RawField::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

impl From<i64> for RawField {
    fn from(value: i64) -> Self {
        RawField::Number(value.into())
    }
}

/// Body of `POST /api/server/loan-estimate` as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    #[serde(default)]
    pub login_id: Option<RawField>,
    #[serde(default)]
    pub nationality: Option<RawField>,
    #[serde(default)]
    pub remain_months: Option<RawField>,
    #[serde(default)]
    pub annual_income: Option<RawField>,
    #[serde(default)]
    pub age: Option<RawField>,
    #[serde(default)]
    pub working_months: Option<RawField>,
    #[serde(default)]
    pub visa_type: Option<RawField>,
    #[serde(default)]
    pub health_insurance: Option<String>,
    #[serde(default)]
    pub test_mode: Option<bool>,
}

/// Validated request: who asked, against which catalog, for which profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateQuery {
    pub login_id: String,
    pub rule_set: RuleSet,
    pub profile: ApplicantProfile,
}

/// Rejections raised before any lender is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("모든 필드가 필요합니다")]
    MissingFields(Vec<&'static str>),
    #[error("{field} 값이 올바르지 않습니다: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("잘못된 JSON 본문입니다.")]
    MalformedBody(String),
}

impl EstimateRequest {
    pub fn into_query(self) -> Result<EstimateQuery, RequestError> {
        let missing: Vec<&'static str> = [
            ("loginId", self.login_id.is_none()),
            ("nationality", self.nationality.is_none()),
            ("remainMonths", self.remain_months.is_none()),
            ("annualIncome", self.annual_income.is_none()),
            ("age", self.age.is_none()),
            ("workingMonths", self.working_months.is_none()),
            ("visaType", self.visa_type.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();
        if !missing.is_empty() {
            return Err(RequestError::MissingFields(missing));
        }

        let profile = ApplicantProfile {
            nationality: required_text(self.nationality),
            remaining_stay_months: months("remainMonths", self.remain_months)?,
            annual_income: income(self.annual_income)?,
            age: integer("age", self.age)?,
            employment_months: months("workingMonths", self.working_months)?,
            visa_type: required_text(self.visa_type),
            health_insurance_type: self.health_insurance,
        };

        Ok(EstimateQuery {
            login_id: required_text(self.login_id),
            rule_set: RuleSet::from_test_mode(self.test_mode.unwrap_or(false)),
            profile,
        })
    }
}

fn required_text(field: Option<RawField>) -> String {
    field.map(|value| value.text()).unwrap_or_default()
}

fn number_text(field: &'static str, raw: Option<RawField>) -> Result<String, RequestError> {
    let text = required_text(raw).trim().to_string();
    if text.is_empty() {
        return Err(RequestError::InvalidField {
            field,
            reason: "empty value".to_string(),
        });
    }
    Ok(text)
}

fn parse_decimal(field: &'static str, raw: Option<RawField>) -> Result<Decimal, RequestError> {
    let text = number_text(field, raw)?;
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| RequestError::InvalidField {
            field,
            reason: format!("`{text}` is not a number"),
        })
}

fn integer(field: &'static str, raw: Option<RawField>) -> Result<i32, RequestError> {
    let value = parse_decimal(field, raw)?;
    if !value.fract().is_zero() {
        return Err(RequestError::InvalidField {
            field,
            reason: format!("`{value}` is not a whole number"),
        });
    }
    value.to_i32().ok_or_else(|| RequestError::InvalidField {
        field,
        reason: format!("`{value}` is out of range"),
    })
}

fn months(field: &'static str, raw: Option<RawField>) -> Result<u32, RequestError> {
    let value = integer(field, raw)?;
    u32::try_from(value).map_err(|_| RequestError::InvalidField {
        field,
        reason: format!("`{value}` must not be negative"),
    })
}

fn income(raw: Option<RawField>) -> Result<Decimal, RequestError> {
    let value = parse_decimal("annualIncome", raw)?;
    if value < Decimal::ZERO {
        return Err(RequestError::InvalidField {
            field: "annualIncome",
            reason: format!("`{value}` must not be negative"),
        });
    }
    Ok(value)
}
