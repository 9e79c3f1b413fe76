//! spalaunch library.
//!
//! Launches single-page-application projects: runs a project's start script
//! when it has one, otherwise serves its static files with SPA fallback.

pub mod archive;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod launch;
pub mod platform;
pub mod server;

pub use error::{Error, Result};
