use clap::Parser;
use schema2form::cli::{self, Cli};
use schema2form::config::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    info!("Deriving from {}", cli.command.path().display());
    let result = cli::execute(&cli.command, &settings)?;
    println!("{}", cli::render(&result, &settings.output)?);

    Ok(())
}
