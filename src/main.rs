//! spalaunch - run single-page-application projects locally.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spalaunch::cli;
use spalaunch::config::{Config, LaunchRequest, PortRequest};
use spalaunch::platform;
use spalaunch::Error;

#[derive(Parser)]
#[command(name = "spalaunch")]
#[command(about = "spalaunch - run single-page-application projects locally")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a project directory or zip archive
    Run {
        /// Project directory or .zip archive (defaults to the current directory)
        path: Option<PathBuf>,

        /// Port to serve on (empty: try the default port, then any free port)
        #[arg(long, short)]
        port: Option<String>,

        /// Don't open a browser once the server is listening
        #[arg(long)]
        no_open: bool,
    },

    /// Create a new project from a template
    Scaffold {
        /// Template name
        template: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spalaunch={}", config.log_level)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match dispatch(cli, &config).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn dispatch(cli: Cli, config: &Config) -> Result<i32, Error> {
    match cli.command {
        None => {
            // Show help when no command provided
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(0)
        }
        Some(Commands::Run {
            path,
            port,
            no_open,
        }) => {
            let source = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            let request = LaunchRequest {
                source,
                port: PortRequest::parse(port.as_deref())?,
                open_browser: !no_open,
            };
            cli::run::run(&request, config, platform::native()).await
        }
        Some(Commands::Scaffold { template }) => {
            cli::scaffold::run(&template).await?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from(["spalaunch", "run", "site.zip", "-p", "3000", "--no-open"])
            .unwrap();
        match cli.command {
            Some(Commands::Run {
                path,
                port,
                no_open,
            }) => {
                assert_eq!(path, Some(PathBuf::from("site.zip")));
                assert_eq!(port.as_deref(), Some("3000"));
                assert!(no_open);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["spalaunch", "run", "--port", ""]).unwrap();
        match cli.command {
            Some(Commands::Run { path, port, no_open }) => {
                assert!(path.is_none());
                assert_eq!(PortRequest::parse(port.as_deref()).unwrap(), PortRequest::Fallback);
                assert!(!no_open);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_run_rejects_extra_positional() {
        assert!(Cli::try_parse_from(["spalaunch", "run", "a", "b"]).is_err());
    }
}
