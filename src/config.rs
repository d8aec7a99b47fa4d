//! Tool configuration - template repository, install directory, commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration loaded from `<config dir>/appstrap/config.toml`.
///
/// Every field has a default, so a missing file yields a fully working
/// setup; the file only needs to name the values being overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppstrapConfig {
    /// Git URL of the application template to provision.
    #[serde(default = "default_template_repo")]
    pub template_repo: String,

    /// Directory name under the home directory that holds the installed app.
    #[serde(default = "default_app_dir")]
    pub app_dir: String,

    /// Port the launched app serves on when none is given on the CLI.
    #[serde(default = "default_port")]
    pub default_port: u16,

    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Argument vectors for the package-manager driven steps and the launcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_install_command")]
    pub install: Vec<String>,

    #[serde(default = "default_build_command")]
    pub build: Vec<String>,

    #[serde(default = "default_start_command")]
    pub start: Vec<String>,
}

fn default_template_repo() -> String {
    "https://github.com/lenajeremy/scout".to_string()
}

fn default_app_dir() -> String {
    ".appstrap".to_string()
}

fn default_port() -> u16 {
    2002
}

fn default_install_command() -> Vec<String> {
    vec!["npm".to_string(), "install".to_string()]
}

fn default_build_command() -> Vec<String> {
    vec!["npx".to_string(), "next".to_string(), "build".to_string()]
}

fn default_start_command() -> Vec<String> {
    vec!["npx".to_string(), "next".to_string(), "start".to_string()]
}

impl Default for AppstrapConfig {
    fn default() -> Self {
        Self {
            template_repo: default_template_repo(),
            app_dir: default_app_dir(),
            default_port: default_port(),
            commands: CommandsConfig::default(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            install: default_install_command(),
            build: default_build_command(),
            start: default_start_command(),
        }
    }
}

impl AppstrapConfig {
    /// Load the user config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Location of the optional config file, when a config dir exists.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("appstrap").join("config.toml"))
    }

    /// The user's home directory, where the clone step runs.
    pub fn home_dir(&self) -> Result<PathBuf> {
        dirs::home_dir().context("Could not determine home directory")
    }

    /// Directory holding the provisioned application (`<home>/<app_dir>`).
    pub fn base_dir(&self) -> Result<PathBuf> {
        Ok(self.home_dir()?.join(&self.app_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppstrapConfig::default();

        assert_eq!(config.app_dir, ".appstrap");
        assert_eq!(config.default_port, 2002);
        assert_eq!(config.commands.install, vec!["npm", "install"]);
        assert_eq!(config.commands.build, vec!["npx", "next", "build"]);
        assert_eq!(config.commands.start, vec!["npx", "next", "start"]);
    }

    #[test]
    fn test_partial_toml_keeps_remaining_defaults() {
        let config: AppstrapConfig = toml::from_str("default_port = 4000").unwrap();

        assert_eq!(config.default_port, 4000);
        assert_eq!(config.app_dir, ".appstrap");
        assert_eq!(config.commands.install, vec!["npm", "install"]);
    }

    #[test]
    fn test_commands_can_be_overridden_individually() {
        let config: AppstrapConfig = toml::from_str(
            r#"
            [commands]
            install = ["yarn"]
            "#,
        )
        .unwrap();

        assert_eq!(config.commands.install, vec!["yarn"]);
        assert_eq!(config.commands.build, vec!["npx", "next", "build"]);
    }

    #[test]
    fn test_base_dir_joins_home_and_app_dir() {
        let config = AppstrapConfig::default();
        let base_dir = config.base_dir().unwrap();

        assert!(base_dir.starts_with(config.home_dir().unwrap()));
        assert!(base_dir.ends_with(".appstrap"));
    }
}
