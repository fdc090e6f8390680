use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use trellis::application::{self, prepare};
use trellis::domain::config::AppConfig;
use trellis::domain::{Request, Response};
use trellis::kernel::config::load_config;
use trellis_logger::Logger;

#[derive(Debug, Parser)]
#[command(name = "trellis", version, about = "Runs a Trellis handler chain")]
struct Cli {
    /// Configuration file; `trellis.*` in the working directory is used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Creates the application and runs its chain once.
    Run {
        /// Payload for the chain: inline JSON or a reference (`./data.json`, `https://…`).
        #[arg(short, long, default_value = "{}")]
        data: String,

        /// Request properties as a JSON object.
        #[arg(short, long, default_value = "{}")]
        request: String,
    },
    /// Lists the registered handler classes.
    Handlers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config: AppConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    match cli.command {
        Command::Run { data, request } => run(&config, parse_data(&data), &request).await,
        Command::Handlers => {
            let registry = trellis::registry();
            let mut names: Vec<_> = registry.names().collect();
            names.sort_unstable();
            let mut out = std::io::stdout().lock();
            for name in names {
                writeln!(out, "{name}")?;
            }
            Ok(())
        },
    }
}

async fn run(config: &AppConfig, data: Value, request: &str) -> anyhow::Result<()> {
    let request: Request = serde_json::from_str(request).context("`--request` must be a JSON object")?;
    let context = trellis::context(config)?;

    let mut app = context.create(application::NAME, Value::Null, None).await?;
    let log = prepare(app.as_mut(), context.loader(), config.application.clone()).await?;
    let _logger = Logger::builder()
        .name(env!("CARGO_BIN_NAME"))
        .config(log.as_ref().unwrap_or(&config.log))
        .init()?;
    info!(prefix = %config.prefix, "Running application chain");

    let mut response = Response::new();
    // A chain failure is reported as its envelope rather than as a process error.
    let envelope = context
        .invoke(app.as_mut(), &request, &mut response, data)
        .await
        .unwrap_or_else(Into::into);

    let output = json!({ "envelope": envelope, "response": response });
    writeln!(std::io::stdout().lock(), "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

/// Inline JSON is used as-is; anything that does not parse is taken as a reference.
fn parse_data(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}
