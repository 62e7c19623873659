//! Headless QR code server binary.
//!
//! Starts the axum web server and waits for Ctrl+C.

use tracing_subscriber::EnvFilter;

use qr_watermark_lib::app::SharedState;
use qr_watermark_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting QR watermark server");

    let config = qr_watermark_lib::init_config()?;
    let state = SharedState::new(config);

    let server_state = state.clone();
    let mut server_handle = tokio::spawn(async move { server::start_server(server_state).await });

    tracing::info!(
        port = state.server_port(),
        "Server running. Press Ctrl+C to stop."
    );

    let interrupted = tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            true
        }
        // Server exited on its own (bind failure or similar).
        res = &mut server_handle => {
            res??;
            false
        }
    };

    if interrupted {
        tracing::info!("Shutting down...");
        state.shutdown_token().cancel();
        server_handle.await??;
    }

    Ok(())
}
