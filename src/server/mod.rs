//! Built-in static file server for SPA projects.

mod port;
mod routes;

pub use port::{bind, HOST};
pub use routes::{is_static_asset, router, STATIC_EXTENSIONS};

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::browser;
use crate::config::ServerConfig;
use crate::error::Error;
use crate::platform::Platform;

/// A bound static server. Owns its listener until `run` returns.
pub struct StaticServer {
    listener: TcpListener,
    port: u16,
    root: PathBuf,
    config: ServerConfig,
}

impl StaticServer {
    /// Bind the listener for `config.root`.
    pub async fn bind(config: ServerConfig) -> Result<Self, Error> {
        let root = std::path::absolute(&config.root)?;
        let (listener, port) = port::bind(config.port, config.default_port).await?;
        info!(port, root = %root.display(), "Listener bound");

        Ok(Self {
            listener,
            port,
            root,
            config,
        })
    }

    /// Port read back from the live listener.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Serve until Ctrl+C or a fatal I/O error.
    pub async fn run(self, platform: Arc<dyn Platform>) -> Result<(), Error> {
        self.run_until(platform, shutdown_signal()).await
    }

    /// Serve until `shutdown` completes.
    pub async fn run_until<F>(self, platform: Arc<dyn Platform>, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let url = self.url();
        let app = router(&self.root, &self.config.index_file);

        println!("Serving {}", self.root.display());
        println!("Available on: {}", url);
        println!("Press Ctrl+C to stop.");

        if self.config.open_browser {
            // Detached; never awaited.
            browser::open_after(platform, url, self.config.browser_delay);
        }

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down...");
    }
}
