//! `appstrap start` - provision the app template and launch it

use crate::config::AppstrapConfig;
use crate::provision::{launch_command, provision_steps, Sequencer, Step};
use crate::runner::{CommandRunner, CommandSpec, ProcessRunner};
use crate::state::{SettingsFile, StateStore};
use crate::Result;
use colored::Colorize;

pub async fn run(port: Option<u16>) -> Result<()> {
    let config = AppstrapConfig::load()?;
    let port = resolve_port(port, &config);
    let base_dir = config.base_dir()?;

    println!();
    println!("{}", "🚀 appstrap".cyan().bold());
    println!(
        "{}",
        format!("   Template:    {}", config.template_repo).bright_black()
    );
    println!(
        "{}",
        format!("   Install dir: {}", base_dir.display()).bright_black()
    );
    println!();

    let store = SettingsFile::in_dir(&base_dir);
    let runner = CommandRunner::new();
    let steps = provision_steps(&config)?;
    let launch = launch_command(&config, port)?;

    provision_and_launch(&store, &runner, &steps, &launch, true).await
}

/// Run the memoized provisioning steps, then start the application.
///
/// The launch is never recorded in the settings file; it runs on every
/// invocation, and its failure carries the child's exit code back to the
/// caller.
async fn provision_and_launch(
    store: &dyn StateStore,
    runner: &dyn ProcessRunner,
    steps: &[Step],
    launch: &CommandSpec,
    show_progress: bool,
) -> Result<()> {
    Sequencer::new(store, runner)
        .with_progress(show_progress)
        .run_all(steps)
        .await?;

    println!();
    println!("{}", format!("🚀 Launching: {}", launch).cyan().bold());

    runner.run(launch).await?;
    Ok(())
}

/// The CLI port argument when given, otherwise the configured default.
fn resolve_port(cli_port: Option<u16>, config: &AppstrapConfig) -> u16 {
    cli_port.unwrap_or(config.default_port)
}
