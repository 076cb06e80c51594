/*
 * Responsibility
 * - tokio runtime entry point
 * - delegate to app::run() (no logic here)
 */
mod api;
mod app;
mod config;
mod error;
mod middleware;
mod services;
mod state;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
