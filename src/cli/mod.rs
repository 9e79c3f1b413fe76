//! CLI commands for spalaunch.

pub mod run;
pub mod scaffold;
