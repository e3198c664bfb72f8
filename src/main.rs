use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use figkit::designer::history::{codegen, script};
use figkit::designer::ArgValue;
use figkit::Config;

#[derive(Parser, Debug)]
#[command(name = "figkit", version = figkit::VERSION, about = "Inspect and verify FigKit generated code")]
struct Cli {
    /// Configuration file (JSON or TOML); defaults to the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the generated block of a script and check that it round-trips
    Check {
        script: PathBuf,

        /// Figure number whose block to read
        #[arg(long, default_value_t = 1)]
        figure: u32,

        /// Print the statements as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
    /// Print version and build date
    Version,
}

#[derive(Serialize)]
struct StatementReport<'a> {
    target: String,
    property: &'static str,
    args: &'a [ArgValue],
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::load_or_default().context("loading user configuration")?,
    };
    Ok(config)
}

fn check(config: &Config, path: &Path, figure: u32, json: bool) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let statements = script::extract_block(&text, &config.output, figure)
        .with_context(|| format!("parsing generated block of figure {}", figure))?;
    let lines = codegen::render_verified(&statements).context("verifying generated code")?;
    tracing::info!("{}: {} statements for figure {}", path.display(), lines.len(), figure);

    if json {
        let report: Vec<StatementReport> = statements
            .iter()
            .map(|s| StatementReport {
                target: s.target.to_string(),
                property: s.property.as_str(),
                args: &s.args,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in &lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        figkit::init_json_logging()?;
    } else {
        figkit::init_logging()?;
    }

    match &cli.command {
        Command::Check {
            script,
            figure,
            json,
        } => {
            let config = load_config(cli.config.as_ref())?;
            check(&config, script, *figure, *json)
        }
        Command::Config => {
            let config = load_config(cli.config.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Version => {
            println!("figkit {} (built {})", figkit::VERSION, figkit::BUILD_DATE);
            Ok(())
        }
    }
}
