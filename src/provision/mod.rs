//! Idempotent provisioning sequence
//!
//! Turns the configured template into a runnable local app in three ordered
//! steps (clone, install, build). Each step is memoized through the state
//! store, so only work that has not already succeeded is repeated.

mod sequencer;
mod step;

pub use sequencer::{ProvisionError, Sequencer};
pub use step::{launch_command, provision_steps, Step, StepId};
