mod cli;
mod diagnose;
mod infra;
mod routes;
mod server;

use formcheck::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
