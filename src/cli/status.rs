//! `appstrap status` - report which provisioning steps have completed

use crate::config::AppstrapConfig;
use crate::provision::StepId;
use crate::state::{SettingsFile, StateStore};
use crate::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct StatusReport {
    app_dir: String,
    app_dir_exists: bool,
    settings_file: String,
    steps: Vec<StepStatus>,
}

#[derive(Debug, Serialize)]
struct StepStatus {
    step: StepId,
    key: &'static str,
    complete: bool,
}

pub fn run(json: bool) -> Result<()> {
    let config = AppstrapConfig::load()?;
    let base_dir = config.base_dir()?;
    let store = SettingsFile::in_dir(&base_dir);
    let report = build_report(&base_dir, &store);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Provisioning status".cyan().bold());
    println!();
    println!("   App dir: {}", report.app_dir);
    println!();

    for step in &report.steps {
        if step.complete {
            println!("   {} {}", "✔".green(), step.step.label());
        } else {
            println!("   {} {}", "○".bright_black(), step.step.label());
        }
    }
    println!();

    if report.steps.iter().all(|s| s.complete) {
        println!(
            "   {}",
            "All steps complete. 'appstrap start' goes straight to launch.".green()
        );
    } else if !report.app_dir_exists {
        println!(
            "   {}",
            "Nothing provisioned yet. Run 'appstrap start' to begin.".yellow()
        );
    } else {
        println!(
            "   {}",
            "Provisioning unfinished. Run 'appstrap start' to resume.".yellow()
        );
    }

    if report.steps.iter().any(|s| s.complete) {
        println!(
            "   {}",
            format!("To start over, delete {}", report.settings_file).bright_black()
        );
    }

    Ok(())
}

fn build_report(base_dir: &Path, store: &SettingsFile) -> StatusReport {
    StatusReport {
        app_dir: base_dir.display().to_string(),
        app_dir_exists: base_dir.exists(),
        settings_file: store.path().display().to_string(),
        steps: StepId::ALL
            .iter()
            .map(|&step| StepStatus {
                step,
                key: step.settings_key(),
                complete: store.is_complete(step),
            })
            .collect(),
    }
}
