//! Run a project directory or archive.

use std::sync::Arc;

use tracing::info;

use crate::archive;
use crate::config::{Config, LaunchRequest, ServerConfig};
use crate::error::Error;
use crate::launch::{self, LaunchPlan};
use crate::platform::Platform;
use crate::server::StaticServer;

/// Run the `run` command and return the process exit code.
///
/// A start script's exit code is returned as-is. The built-in server only
/// returns once it has been stopped.
pub async fn run(
    request: &LaunchRequest,
    config: &Config,
    platform: Arc<dyn Platform>,
) -> Result<i32, Error> {
    let target = archive::resolve_source(&request.source)?;
    if target.extracted {
        println!("Extracted to {}", target.directory.display());
    }
    info!(dir = %target.directory.display(), extracted = target.extracted, "Resolved project");

    let plan = launch::resolve(&target.directory, platform.as_ref());
    match plan {
        LaunchPlan::RunScript(script) => {
            println!(
                "Running {} in {}",
                script.path.display(),
                script.dir.display()
            );
            launch::run_script(&script, platform).await
        }
        LaunchPlan::RunServer => {
            let server_config = ServerConfig::new(target.directory, request, &config.server);
            let server = StaticServer::bind(server_config).await?;
            server.run(platform).await?;
            Ok(0)
        }
    }
}
