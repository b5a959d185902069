mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use stage_placement::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
