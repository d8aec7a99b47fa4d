//! Step definitions for the provisioning sequence

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::AppstrapConfig;
use crate::runner::CommandSpec;

/// Identity of one provisioning step.
///
/// The enum is the only way to address a completion flag; the raw key
/// strings persisted in the settings file live in
/// [`StepId::settings_key`], so a step-name typo is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    CloneRepo,
    InstallPackages,
    BuildProject,
}

impl StepId {
    /// Every provisioning step, in execution order.
    pub const ALL: [StepId; 3] = [
        StepId::CloneRepo,
        StepId::InstallPackages,
        StepId::BuildProject,
    ];

    /// Key under which this step's completion flag is persisted.
    pub fn settings_key(&self) -> &'static str {
        match self {
            StepId::CloneRepo => "hasClonedRepo",
            StepId::InstallPackages => "hasInstalledPackages",
            StepId::BuildProject => "hasBuiltProject",
        }
    }

    /// Short human-facing name used in status output and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            StepId::CloneRepo => "Clone template",
            StepId::InstallPackages => "Install packages",
            StepId::BuildProject => "Build project",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One unit of provisioning work: what to run and what to tell the user.
#[derive(Debug)]
pub struct Step {
    pub id: StepId,
    pub running: &'static str,
    pub success: &'static str,
    pub failure: &'static str,
    pub command: CommandSpec,
}

/// Build the full provisioning sequence for `config`, in execution order.
///
/// The clone runs from the home directory so the checkout lands at
/// `<home>/<app_dir>`; install and build run inside the checkout, which the
/// clone step is responsible for creating.
pub fn provision_steps(config: &AppstrapConfig) -> Result<Vec<Step>> {
    let home_dir = config.home_dir()?;
    let base_dir = config.base_dir()?;

    let clone = CommandSpec {
        program: "git".to_string(),
        args: vec![
            "clone".to_string(),
            config.template_repo.clone(),
            config.app_dir.clone(),
        ],
        cwd: home_dir,
    };
    let install = CommandSpec::from_argv(&config.commands.install, &base_dir)
        .context("Invalid commands.install in config")?;
    let build = CommandSpec::from_argv(&config.commands.build, &base_dir)
        .context("Invalid commands.build in config")?;

    Ok(vec![
        Step {
            id: StepId::CloneRepo,
            running: "Downloading app template...",
            success: "App template downloaded",
            failure: "Failed to clone template repository",
            command: clone,
        },
        Step {
            id: StepId::InstallPackages,
            running: "Installing packages...",
            success: "Packages installed",
            failure: "Failed to install packages",
            command: install,
        },
        Step {
            id: StepId::BuildProject,
            running: "Building project...",
            success: "Build completed",
            failure: "Build failed",
            command: build,
        },
    ])
}

/// The command that starts the provisioned application.
///
/// Never memoized; `--port` is appended so the app serves on the requested
/// port.
pub fn launch_command(config: &AppstrapConfig, port: u16) -> Result<CommandSpec> {
    let mut spec = CommandSpec::from_argv(&config.commands.start, config.base_dir()?)
        .context("Invalid commands.start in config")?;
    spec.args.push("--port".to_string());
    spec.args.push(port.to_string());
    Ok(spec)
}
