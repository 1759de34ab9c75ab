mod cli;
mod commands;
mod infra;
mod render;
mod routes;
mod server;
mod views;

use escola_finder::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
