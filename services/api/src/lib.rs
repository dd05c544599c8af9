mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use loandoc_core::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
