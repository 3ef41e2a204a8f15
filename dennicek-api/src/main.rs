use dennicek_api::{
    config::{self, InitError, ServerEnv, StoreEnv},
    server::{self, ServerState},
};
use std::net::SocketAddr;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(%err, "Could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                error!(%err, "Could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    config::install_tracing();
    config::load_dotenv()?;
    let server_env: ServerEnv = config::get_env()?;
    let store_env: StoreEnv = config::get_env()?;

    let store = config::open_store(&store_env).await?;
    let state = ServerState {
        store: store.clone(),
    };
    let app = server::app(state, server_env.client_dist.as_deref());

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_shutdown_signal().await;
            info!("Shutting down");
            shutdown.cancel();
        }
    });

    let server_address = SocketAddr::new(server_env.server_address, server_env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(InitError::TcpServe)?;

    store.close().await;

    Ok(())
}
