//! server
//!
//! The HTTP surface: a JSON API over the dispatch layer, HTML fragments
//! for the browser shell, and the shell itself.
//!
//! # Design
//!
//! Handlers hold no repository state. Every request names its repository
//! (`repoPath`), and a fresh [`RepositoryHandle`] is built for it, so one
//! server can drive any number of working copies. Shared state is limited
//! to configuration snapshot values.
//!
//! # Example
//!
//! ```ignore
//! let state = AppState::from_config(&config, None);
//! let addr: SocketAddr = "127.0.0.1:3000".parse()?;
//! server::serve(state, addr).await?;
//! ```

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::flow::FlowConfig;

pub use routes::create_router;

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Values shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Git executable used for every repository
    pub git_binary: String,
    /// Repository prefilled in the browser shell
    pub default_repo: Option<PathBuf>,
    /// History page size for `/ui/commits`
    pub page_size: usize,
    /// Number of commits returned by `/api/commits`
    pub recent_commits: usize,
    pub flow: FlowConfig,
}

impl AppState {
    pub fn from_config(config: &Config, default_repo: Option<PathBuf>) -> Self {
        Self {
            git_binary: config.git_binary().to_string(),
            default_repo,
            page_size: config.page_size(),
            recent_commits: config.recent_commits(),
            flow: config.flow(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default(), None)
    }
}

/// A server bound to a listener, not yet accepting.
pub struct Bound {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Bound {
    /// Bind `addr`. Port 0 picks a free port.
    pub async fn bind(state: AppState, addr: SocketAddr) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = create_router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("server stopped");
        Ok(())
    }
}

/// Bind and serve until shutdown.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), ServerError> {
    let bound = Bound::bind(state, addr).await?;
    info!(addr = %bound.local_addr()?, "listening");
    bound.run().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_default_config() {
        let state = AppState::default();
        assert_eq!(state.git_binary, "git");
        assert_eq!(state.page_size, 50);
        assert_eq!(state.recent_commits, 10);
        assert_eq!(state.flow.develop, "develop");
        assert!(state.default_repo.is_none());
    }

    #[tokio::test]
    async fn bind_ephemeral_port() {
        let bound = Bound::bind(AppState::default(), "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        assert_ne!(bound.local_addr().unwrap().port(), 0);
    }
}
