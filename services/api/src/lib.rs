mod cli;
mod infra;
mod report;
mod routes;
mod server;

use ppm_compass::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
