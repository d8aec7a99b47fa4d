//! Sequential step execution with memoized completion.
//!
//! The sequencer is the heart of the tool: it walks the ordered step list,
//! skips anything the state store already marks complete, and persists each
//! new completion before moving on. A failed step aborts the run; the next
//! invocation resumes from exactly that step.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::runner::{ProcessRunner, RunnerError};
use crate::state::StateStore;

use super::step::{Step, StepId};

/// Fatal provisioning failure. Later steps were not attempted.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: StepId,
        #[source]
        source: RunnerError,
    },
}

/// Drives the ordered provisioning steps against a state store and runner.
pub struct Sequencer<'a> {
    store: &'a dyn StateStore,
    runner: &'a dyn ProcessRunner,
    show_progress: bool,
}

impl<'a> Sequencer<'a> {
    pub fn new(store: &'a dyn StateStore, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            store,
            runner,
            show_progress: true,
        }
    }

    /// Disable the spinner (tests and non-interactive callers).
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run every step not yet marked complete, in declared order.
    ///
    /// Fail-fast: the first failing step ends the run and the steps after it
    /// stay untouched. No retries; the caller re-invokes the whole program
    /// to try again.
    pub async fn run_all(&self, steps: &[Step]) -> Result<(), ProvisionError> {
        for step in steps {
            self.run_step(step).await?;
        }
        Ok(())
    }

    async fn run_step(&self, step: &Step) -> Result<(), ProvisionError> {
        if self.store.is_complete(step.id) {
            println!(
                "{} {}",
                "✔".green(),
                format!("{} (already done)", step.success).bright_black()
            );
            return Ok(());
        }

        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap()
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
            );
            pb.set_message(step.running);
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let result = self.runner.run(&step.command).await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        match result {
            Ok(()) => {
                if !self.store.set(step.id, true) {
                    eprintln!(
                        "{} {}",
                        "⚠".yellow(),
                        format!(
                            "Could not record completion of '{}'; it will run again next time.",
                            step.id
                        )
                        .yellow()
                    );
                }
                println!("{} {}", "✔".green(), step.success);
                Ok(())
            }
            Err(source) => {
                eprintln!("{} {}", "✗".red(), step.failure.red());
                Err(ProvisionError::StepFailed {
                    step: step.id,
                    source,
                })
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
