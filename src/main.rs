//! Command line access to a bundle described by `.i18n-bundle.json`.

use std::io::{
    self,
    Write,
};
use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use clap::{
    Parser,
    Subcommand,
};
use i18n_bundle::{
    LocaleTag,
    config,
};
use serde_json::Value;

/// Inspect translation bundles.
#[derive(Debug, Parser)]
#[command(name = "i18n-bundle", version, about)]
struct Cli {
    /// Directory holding `.i18n-bundle.json`; relative source paths start here.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every translation as JSON.
    Export,
    /// Print the translation of a key.
    Translate {
        /// Requested locale, e.g. `es` or `en-US`.
        locale: String,
        key: String,
        /// Template data as a JSON value.
        #[arg(long)]
        data: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_bundle=warn".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let bundle = config::build_bundle(&cli.root)
        .with_context(|| format!("failed to build bundle from '{}'", cli.root.display()))?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Export => {
            let export = serde_json::to_string_pretty(&bundle.export())?;
            writeln!(stdout, "{export}")?;
        }
        Command::Translate { locale, key, data } => {
            let locale = LocaleTag::parse(&locale)?;
            let text = match data {
                Some(data) => {
                    let data: Value =
                        serde_json::from_str(&data).context("--data is not valid JSON")?;
                    bundle.translate_with(&locale, &key, &data)
                }
                None => bundle.translate(&locale, &key),
            };
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}
