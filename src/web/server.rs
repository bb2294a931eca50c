//! Web server for the admin API.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{FetchConfig, ServerConfig};
use crate::feed::ActivityLog;
use crate::web::handlers::AppState;
use crate::web::router::{create_fixture_router, create_health_router, create_router};
use crate::{Database, FeedmillError, Result};

/// Web server for the admin API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    fixtures_path: String,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(
        server_config: &ServerConfig,
        fetch_config: FetchConfig,
        db: Database,
        activity: ActivityLog,
    ) -> Result<Self> {
        let addr = format!("{}:{}", server_config.host, server_config.port)
            .parse()
            .map_err(|e| {
                FeedmillError::Config(format!("invalid web server address: {e}"))
            })?;

        let app_state = AppState::new(db, fetch_config, activity)?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            fixtures_path: server_config.test_feeds_path.clone(),
        })
    }

    /// Get the configured address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The application state behind this server.
    pub fn app_state(&self) -> Arc<AppState> {
        Arc::clone(&self.app_state)
    }

    fn build_router(&self) -> axum::Router {
        create_router(Arc::clone(&self.app_state))
            .merge(create_health_router())
            .merge(create_fixture_router(&self.fixtures_path))
            .layer(CompressionLayer::new())
    }

    /// Run the web server until the process exits.
    pub async fn run(self) -> Result<()> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
