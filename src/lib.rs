// Appstrap - bootstrap CLI for a remote app template
// Clones, installs, builds, and launches, memoizing each finished step

pub mod cli;
pub mod config;
pub mod provision;
pub mod runner;
pub mod state;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use config::AppstrapConfig;
pub use provision::{launch_command, provision_steps, ProvisionError, Sequencer, Step, StepId};
pub use runner::{CommandRunner, CommandSpec, ProcessRunner, RunnerError};
pub use state::{SettingsFile, StateStore, SETTINGS_FILE_NAME};
