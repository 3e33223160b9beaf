use log::{error, info};

use axum::Router;
use axum::routing::post;
use tokio::net::TcpListener;

use crate::error::DirectoryError;
use crate::server::handler::{directory, method_not_allowed};
use crate::server::state::AppState;

/// Build the HTTP router for the directory callback
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/directory", post(directory).fallback(method_not_allowed))
        .with_state(state)
}

pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Bind the configured listen address
    pub async fn bind(state: AppState) -> Result<Self, DirectoryError> {
        let socket = state.config.listen.socket();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        Ok(Self { listener, state })
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<(), DirectoryError> {
        info!(
            "Serving directory for {} domain(s) on {}",
            self.state.domains().len(),
            self.state.config.listen.socket()
        );

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
