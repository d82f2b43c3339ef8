mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use torre_controle::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
