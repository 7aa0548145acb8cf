use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Cli, Command};
use crate::schema_form::DeriveOptions;

/// Settings resolved from file, environment and command line (later wins)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub derive: DeriveOptions,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputSettings {
    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Load `schema2form.{toml,yaml,json}` from `root`, if present
    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("schema2form");
        Self::load(File::from(config_path).required(false))
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(File::from(cli.config.clone()).required(false))?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        tracing::debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    fn load<T>(file: T) -> Result<Self, anyhow::Error>
    where
        T: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("SCHEMA2FORM").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.compact {
            self.output.pretty = false;
        }

        if let Command::Inputs {
            no_object_description,
            output_name,
            identifiers_hidden,
            ..
        } = &cli.command
        {
            if *no_object_description {
                self.derive.object.description = false;
            }
            if let Some(output_name) = output_name {
                self.derive.output_name = (*output_name).into();
            }
            if *identifiers_hidden {
                self.derive.string.identifiers_hidden = true;
            }
        }
    }
}
