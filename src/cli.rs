use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::config::{OutputSettings, Settings};
use crate::schema_form::{
    derive_default_values, derive_inputs, load_document, load_documents_from_dir, OutputName,
    SchemaNode,
};

/// Derive form defaults and input descriptors from schema documents
#[derive(Parser, Debug, Clone)]
#[command(name = "schema2form", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SCHEMA2FORM_CONFIG", default_value = "schema2form.toml", global = true)]
    pub config: PathBuf,

    /// Print single-line JSON
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the default-value record of a schema
    Defaults {
        /// Schema document, or a directory of documents
        path: PathBuf,
    },
    /// Print the input descriptors of a schema
    Inputs {
        /// Schema document, or a directory of documents
        path: PathBuf,

        /// Do not emit dividers for described objects
        #[arg(long)]
        no_object_description: bool,

        /// How nested objects are named
        #[arg(long, value_enum)]
        output_name: Option<OutputNameArg>,

        /// Render uuid/cuid/cuid2/ulid strings as hidden inputs
        #[arg(long)]
        identifiers_hidden: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputNameArg {
    Inline,
    Grouped,
}

impl From<OutputNameArg> for OutputName {
    fn from(arg: OutputNameArg) -> Self {
        match arg {
            OutputNameArg::Inline => OutputName::Inline,
            OutputNameArg::Grouped => OutputName::Grouped,
        }
    }
}

impl Command {
    pub fn path(&self) -> &Path {
        match self {
            Command::Defaults { path } | Command::Inputs { path, .. } => path.as_path(),
        }
    }
}

/// Run a command against the resolved settings.
///
/// A directory path derives every document in it and keys the results by
/// file stem. Two documents sharing a stem are an error.
pub fn execute(command: &Command, settings: &Settings) -> anyhow::Result<Value> {
    let path = command.path();

    if path.is_dir() {
        let mut results = Map::new();
        for (file, schema) in load_documents_from_dir(path)? {
            let key = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            if results.contains_key(&key) {
                anyhow::bail!(
                    "{}: another document in {} is already keyed '{}'",
                    file.display(),
                    path.display(),
                    key
                );
            }
            let value = derive_one(command, &schema, settings)
                .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), e))?;
            results.insert(key, value);
        }
        tracing::info!("Derived {} documents from {}", results.len(), path.display());
        Ok(Value::Object(results))
    } else {
        let schema = load_document(path)?;
        derive_one(command, &schema, settings)
    }
}

fn derive_one(command: &Command, schema: &SchemaNode, settings: &Settings) -> anyhow::Result<Value> {
    match command {
        Command::Defaults { .. } => Ok(Value::Object(derive_default_values(schema)?)),
        Command::Inputs { .. } => Ok(serde_json::to_value(derive_inputs(schema, &settings.derive)?)?),
    }
}

/// Render a command result as JSON text
pub fn render(value: &Value, output: &OutputSettings) -> serde_json::Result<String> {
    if output.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["schema2form", "defaults", "user.json"]);
        assert_eq!(cli.config, PathBuf::from("schema2form.toml"));
        assert!(!cli.compact);
        assert_eq!(cli.command.path(), Path::new("user.json"));
    }

    #[test]
    fn test_cli_inputs_with_args() {
        let cli = Cli::parse_from([
            "schema2form",
            "--config",
            "custom.toml",
            "inputs",
            "schemas/",
            "--no-object-description",
            "--output-name",
            "grouped",
            "--identifiers-hidden",
            "--compact",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert!(cli.compact);
        match cli.command {
            Command::Inputs {
                path,
                no_object_description,
                output_name,
                identifiers_hidden,
            } => {
                assert_eq!(path, PathBuf::from("schemas/"));
                assert!(no_object_description);
                assert_eq!(output_name, Some(OutputNameArg::Grouped));
                assert!(identifiers_hidden);
            }
            other => panic!("Expected inputs command, got {:?}", other),
        }
    }

    #[test]
    fn test_render_compact() {
        let value = serde_json::json!({ "a": 1 });
        let output = OutputSettings { pretty: false };
        assert_eq!(render(&value, &output).unwrap(), r#"{"a":1}"#);
    }
}
