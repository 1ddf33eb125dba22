mod adapters;
mod app;
mod core;
mod global_constants;
mod ports;
mod presentation;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    log::info!("[MAIN] Starting {}", global_constants::APPLICATION_NAME);

    if !utils::ensure_single_instance() {
        log::error!("[MAIN] Failed to ensure single instance");
    }

    let app = app::KioskApp::build().await?;
    app.run().await
}
