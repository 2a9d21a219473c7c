//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the redirect middleware in front
//! - Answer non-redirected requests with 404
//! - Wire up timeout and tracing layers
//! - Swap the live rule set when the config watcher reports a change
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RedirectConfig;
use crate::http::middleware::{redirect_middleware, RedirectState, RuleSet};

/// HTTP front end for the redirect engine.
pub struct HttpServer {
    router: Router,
    config: RedirectConfig,
    state: RedirectState,
}

impl HttpServer {
    /// Create a server serving the rules in `config`.
    pub fn new(config: RedirectConfig) -> Self {
        let state = RedirectState::new(
            RuleSet::new(config.redirects.clone(), config.options.clone()),
            config.listener.clone(),
        );
        Self::with_state(config, state)
    }

    /// Create a server around prepared middleware state (custom handlers or hooks).
    pub fn with_state(config: RedirectConfig, state: RedirectState) -> Self {
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    #[allow(deprecated)]
    fn build_router(config: &RedirectConfig, state: RedirectState) -> Router {
        Router::new().fallback(not_found).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.listener.request_timeout_secs,
                )))
                .layer(from_fn_with_state(state, redirect_middleware)),
        )
    }

    /// Clone of the assembled router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Live middleware state; `replace` on it swaps the rule set.
    pub fn state(&self) -> &RedirectState {
        &self.state
    }

    /// The config the server was started with.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Every config received on `config_updates` replaces the live rules and
    /// options; listener and observability changes need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RedirectConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            redirects = self.config.redirects.len(),
            "HTTP server starting"
        );

        let state = self.state.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => {
                            tracing::info!(
                                redirects = config.redirects.len(),
                                "Applying reloaded redirect rules"
                            );
                            state.replace(RuleSet::new(config.redirects, config.options));
                        }
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
