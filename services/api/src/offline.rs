use crate::infra::{catalog_store, estimate_engine};
use clap::Args;
use loandoc_core::config::{AppConfig, CatalogConfig, EngineConfig};
use loandoc_core::error::AppError;
use loandoc_core::estimate::{EstimateRequest, LoanEstimateService, RuleSet};
use loandoc_core::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// JSON file holding a loan estimate request body
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Directory with bank_info.csv and test_bank_info.csv (defaults to LOANDOC_CATALOG_DIR)
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
    /// Evaluate against the test catalog regardless of the request's testMode
    #[arg(long)]
    pub(crate) test_mode: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LendersArgs {
    /// Directory with bank_info.csv and test_bank_info.csv (defaults to LOANDOC_CATALOG_DIR)
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
    /// List the test catalog instead of production
    #[arg(long)]
    pub(crate) test_mode: bool,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        request,
        catalog_dir,
        test_mode,
    } = args;

    let raw = std::fs::read_to_string(&request)?;
    let mut request: EstimateRequest = serde_json::from_str(&raw)?;
    if test_mode {
        request.test_mode = Some(true);
    }

    let (catalog, engine) = offline_settings(catalog_dir)?;
    let service =
        LoanEstimateService::new(Arc::new(catalog_store(&catalog)), estimate_engine(&engine));
    let query = request.into_query()?;
    let response = service.estimate_query(&query);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn run_lenders(args: LendersArgs) -> Result<(), AppError> {
    let (catalog, engine) = offline_settings(args.catalog_dir)?;
    let service =
        LoanEstimateService::new(Arc::new(catalog_store(&catalog)), estimate_engine(&engine));
    let lenders = service.lenders(RuleSet::from_test_mode(args.test_mode));

    println!("{}", serde_json::to_string_pretty(&lenders)?);
    Ok(())
}

fn offline_settings(
    catalog_dir: Option<PathBuf>,
) -> Result<(CatalogConfig, EngineConfig), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let catalog = match catalog_dir {
        Some(directory) => CatalogConfig {
            directory: Some(directory),
        },
        None => config.catalog,
    };
    Ok((catalog, config.engine))
}
