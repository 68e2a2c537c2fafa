pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod midi;

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use config::Config;
use dispatcher::{DispatchError, NoteDispatcher};
use midi::{MidiDriver, MidiError, MidiOutputManager};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
    #[error(transparent)]
    Midi(#[from] MidiError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Print the available output ports, one per line
pub fn print_devices() -> Result<(), ServerError> {
    let devices = MidiOutputManager::available_devices()?;
    if devices.is_empty() {
        println!("No MIDI output devices found");
    }
    for device in devices {
        println!("{}: {}", device.index, device.name);
    }
    Ok(())
}

/// Open the configured device and serve until Ctrl-C.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let driver = MidiOutputManager::new(config.channel);
    let dispatcher = Arc::new(NoteDispatcher::new(driver, config.dispatch_settings()));

    // Same as a device switch: open the port and select the cached instrument (0)
    dispatcher.open_device(config.device)?;

    serve(config, dispatcher).await
}

/// Serve the HTTP API over an already-initialized dispatcher
pub async fn serve<D: MidiDriver>(
    config: Config,
    dispatcher: Arc<NoteDispatcher<D>>,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    log::info!("Listening on http://{}", config.bind);

    let app = commands::router(Arc::clone(&dispatcher));
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve);

    log::info!("Shutting down, releasing MIDI device");
    dispatcher.close();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
