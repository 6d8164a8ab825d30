use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use vfit_sheet::SheetConfig;

use crate::error::{HarnessError, Result};
use crate::logging;
use crate::replay;
use crate::script::GestureScript;

#[derive(Debug, Parser)]
#[command(
    name = "vfit-harness",
    about = "Replay scripted gestures through the VirtualFit store sheet",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a gesture script and print the per-step report as JSON.
    Replay(ReplayArgs),

    /// Print the effective sheet configuration.
    #[command(name = "print-config")]
    PrintConfig(PrintConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Gesture script (JSON).
    pub script: PathBuf,

    /// Sheet configuration (TOML or JSON). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Override the script's viewport height.
    #[arg(long)]
    pub viewport_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct PrintConfigArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(args),
        Commands::PrintConfig(args) => {
            println!("{}", render_config(&args)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SheetConfig> {
    match path {
        Some(path) if !path.exists() => Err(HarnessError::MissingPath { path: path.clone() }),
        Some(path) => Ok(SheetConfig::from_file(path)?.validated()?),
        None => Ok(SheetConfig::default()),
    }
}

pub fn render_config(args: &PrintConfigArgs) -> Result<String> {
    let config = load_config(args.config.as_ref())?;
    Ok(match args.format {
        ConfigFormat::Toml => toml::to_string(&config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
    })
}

pub fn run_replay(args: ReplayArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let mut script = GestureScript::from_file(&args.script)?;
    if let Some(height) = args.viewport_height {
        script.viewport_height = height;
    }
    let report = replay::run(&script, config)?;
    let rendered = serde_json::to_string_pretty(&report)?;
    match args.output {
        Some(path) => {
            fs::write(&path, rendered)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands, ConfigFormat, PrintConfigArgs, render_config};
    use crate::error::HarnessError;

    #[test]
    fn parses_replay_with_global_flag_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vfit-harness",
            "replay",
            "swipe.json",
            "--viewport-height",
            "640",
            "--log-json",
        ])
        .expect("parse");
        assert!(cli.log_json);
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.viewport_height, Some(640.0));
        assert!(args.config.is_none());
    }

    #[test]
    fn default_config_renders_as_toml_and_json() {
        let toml_out = render_config(&PrintConfigArgs {
            config: None,
            format: ConfigFormat::Toml,
        })
        .expect("toml");
        assert!(toml_out.contains("mid_fraction"));

        let json_out = render_config(&PrintConfigArgs {
            config: None,
            format: ConfigFormat::Json,
        })
        .expect("json");
        let value: serde_json::Value = serde_json::from_str(&json_out).expect("valid json");
        assert_eq!(value["fling"]["velocity_threshold"], 500.0);
    }

    #[test]
    fn missing_config_path_is_reported() {
        let err = render_config(&PrintConfigArgs {
            config: Some("/nonexistent/sheet.toml".into()),
            format: ConfigFormat::Toml,
        })
        .expect_err("missing");
        assert!(matches!(err, HarnessError::MissingPath { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
