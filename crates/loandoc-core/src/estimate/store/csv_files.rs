use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use super::super::domain::{LenderConfig, RuleSet};
use super::{LenderConfigStore, StoreError};

pub const PRODUCTION_CATALOG_FILE: &str = "bank_info.csv";
pub const TEST_CATALOG_FILE: &str = "test_bank_info.csv";

const LIST_SEPARATOR: char = '|';

/// Reads `bank_info.csv` / `test_bank_info.csv` from a directory on every call, so catalog
/// edits apply to the next request.
#[derive(Debug, Clone)]
pub struct CsvLenderStore {
    directory: PathBuf,
}

impl CsvLenderStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, rule_set: RuleSet) -> PathBuf {
        let file = match rule_set {
            RuleSet::Production => PRODUCTION_CATALOG_FILE,
            RuleSet::Test => TEST_CATALOG_FILE,
        };
        self.directory.join(file)
    }
}

impl LenderConfigStore for CsvLenderStore {
    fn list_lenders(&self, rule_set: RuleSet) -> Result<Vec<LenderConfig>, StoreError> {
        let path = self.path_for(rule_set);
        let mut reader = ::csv::ReaderBuilder::new()
            .trim(::csv::Trim::All)
            .from_path(&path)
            .map_err(|source| StoreError::Csv {
                path: path.clone(),
                source,
            })?;

        let headers = reader
            .headers()
            .map_err(|source| StoreError::Csv {
                path: path.clone(),
                source,
            })?
            .clone();

        let mut lenders = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) if err.is_io_error() => {
                    return Err(StoreError::Csv {
                        path: path.clone(),
                        source: err,
                    })
                }
                Err(err) => {
                    let line = err.position().map_or(0, |position| position.line());
                    skip_row(&path, line, &err.to_string());
                    continue;
                }
            };
            let line = record.position().map_or(0, |position| position.line());
            let lender = match record
                .deserialize::<CatalogRecord>(Some(&headers))
                .map_err(|err| err.to_string())
                .and_then(CatalogRecord::into_config)
            {
                Ok(lender) => lender,
                Err(reason) => {
                    skip_row(&path, line, &reason);
                    continue;
                }
            };
            if lender.enabled {
                lenders.push(lender);
            }
        }
        Ok(lenders)
    }
}

fn skip_row(path: &Path, line: u64, reason: &str) {
    warn!(path = %path.display(), line, reason, "skipping malformed lender catalog row");
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    name: String,
    rank: Option<i32>,
    allowed_visa_codes: Option<String>,
    excluded_countries: Option<String>,
    required_countries: Option<String>,
    min_age: Option<i32>,
    max_age: Option<i32>,
    min_remaining_stay_months: Option<u32>,
    min_employment_months: Option<u32>,
    min_annual_income: Option<String>,
    weight_factor: String,
    max_limit: String,
    estimated_rate: Option<String>,
    response_latency_ms: Option<i64>,
    enabled: Option<String>,
}

impl CatalogRecord {
    fn into_config(self) -> Result<LenderConfig, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("lender name is empty".to_string());
        }

        Ok(LenderConfig {
            rank: self.rank,
            allowed_visa_codes: split_list(self.allowed_visa_codes.as_deref()).unwrap_or_default(),
            excluded_countries: split_list(self.excluded_countries.as_deref()),
            required_countries: split_list(self.required_countries.as_deref()),
            min_age: self.min_age.unwrap_or(0),
            max_age: self.max_age,
            min_remaining_stay_months: self.min_remaining_stay_months.unwrap_or(0),
            min_employment_months: self.min_employment_months.unwrap_or(0),
            min_annual_income: optional_decimal("min_annual_income", self.min_annual_income)?
                .unwrap_or(Decimal::ZERO),
            estimated_rate: optional_decimal("estimated_rate", self.estimated_rate)?,
            response_latency_ms: self.response_latency_ms,
            enabled: parse_enabled(self.enabled.as_deref())?,
            ..LenderConfig::new(
                name,
                decimal("weight_factor", &self.weight_factor)?,
                decimal("max_limit", &self.max_limit)?,
            )
        })
    }
}

fn split_list(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        raw.split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn decimal(column: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|err| format!("{column} `{raw}` is not a number ({err})"))
}

fn optional_decimal(column: &str, raw: Option<String>) -> Result<Option<Decimal>, String> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => decimal(column, value).map(Some),
    }
}

fn parse_enabled(raw: Option<&str>) -> Result<bool, String> {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("1") | Some("true") | Some("y") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("n") | Some("no") => Ok(false),
        Some(other) => Err(format!("enabled `{other}` is not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    const HEADER: &str = "name,rank,allowed_visa_codes,excluded_countries,required_countries,min_age,max_age,min_remaining_stay_months,min_employment_months,min_annual_income,weight_factor,max_limit,estimated_rate,response_latency_ms,enabled";

    fn write_catalog(dir: &Path, file: &str, rows: &[&str]) {
        let mut body = String::from(HEADER);
        for row in rows {
            body.push('\n');
            body.push_str(row);
        }
        fs::write(dir.join(file), body).expect("catalog written");
    }

    #[test]
    fn parses_rows_and_lists() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_catalog(
            dir.path(),
            PRODUCTION_CATALOG_FILE,
            &[
                "KB저축은행,1,E-7|E-9| F-2 ,,Nepal|Cambodia,19,,8,3,1500,0.35,3000,14.7,120,1",
                "전북은행,,E-9,,,19,,6,6,2000,0.36,5000,13.07,-1,",
            ],
        );
        let store = CsvLenderStore::new(dir.path());

        let lenders = store.list_lenders(RuleSet::Production).expect("catalog loads");

        assert_eq!(lenders.len(), 2);
        let kb = &lenders[0];
        assert_eq!(kb.name, "KB저축은행");
        assert_eq!(kb.rank, Some(1));
        assert_eq!(kb.allowed_visa_codes, vec!["E-7", "E-9", "F-2"]);
        assert_eq!(kb.excluded_countries, None);
        assert_eq!(
            kb.required_countries,
            Some(vec!["Nepal".to_string(), "Cambodia".to_string()])
        );
        assert_eq!(kb.max_age, None);
        assert_eq!(kb.min_annual_income, dec!(1500));
        assert_eq!(kb.weight_factor, dec!(0.35));
        assert_eq!(kb.estimated_rate, Some(dec!(14.7)));
        assert_eq!(kb.response_latency_ms, Some(120));

        let jeonbuk = &lenders[1];
        assert_eq!(jeonbuk.rank, None);
        assert_eq!(jeonbuk.response_latency_ms, Some(-1));
        assert!(jeonbuk.enabled);
    }

    #[test]
    fn skips_disabled_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_catalog(
            dir.path(),
            TEST_CATALOG_FILE,
            &[
                "테스트은행1,1,E-9,,,,,,,,0.1,1000,10,,true",
                "테스트은행2,2,E-9,,,,,,,,0.1,1000,11,,0",
            ],
        );
        let store = CsvLenderStore::new(dir.path());

        let lenders = store.list_lenders(RuleSet::Test).expect("catalog loads");

        assert_eq!(lenders.len(), 1);
        assert_eq!(lenders[0].name, "테스트은행1");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvLenderStore::new(dir.path());

        let err = store
            .list_lenders(RuleSet::Production)
            .expect_err("missing catalog");

        assert!(matches!(err, StoreError::Csv { .. }));
    }

    #[test]
    fn malformed_rows_are_skipped_and_the_rest_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_catalog(
            dir.path(),
            PRODUCTION_CATALOG_FILE,
            &[
                "좋은은행,1,E-9,,,,,,,,0.3,1000,,,",
                "나쁜은행,2,E-9,,,,,,,,heavy,1000,,,",
                "요율은행,3,E-9,,,,,,,,0.3,1000,12%,,",
                "짧은은행,4,E-9",
                ",5,E-9,,,,,,,,0.3,1000,,,",
                "다른은행,,E-9,,,,,,,,0.3,2000,11.5,,",
            ],
        );
        let store = CsvLenderStore::new(dir.path());

        let lenders = store
            .list_lenders(RuleSet::Production)
            .expect("catalog loads despite bad rows");

        let names: Vec<&str> = lenders.iter().map(|lender| lender.name.as_str()).collect();
        assert_eq!(names, vec!["좋은은행", "다른은행"]);
    }
}
