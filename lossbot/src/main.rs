mod config;
mod observability;

use actuarial::{Calculator, HttpFetcher, Source};
use clap::{Parser, Subcommand};
use config::Config;
use shared::credential::Credential;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(version, about = "Slack bot reporting insurance loss ratios")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run the Slack webhook server
    Serve,
    /// Compute the loss ratio of a local workbook and print the message
    Analyze {
        /// Defaults to the configured default spreadsheet
        path: Option<PathBuf>,
    },
    /// Validate configuration and show which credentials are set
    CheckConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        CliCommand::Serve => serve(config),
        CliCommand::Analyze { path } => analyze(config, path),
        CliCommand::CheckConfig => {
            print_credentials(&config);
            println!("Configuration is valid");
            ExitCode::SUCCESS
        }
    }
}

fn print_credentials(config: &Config) {
    println!("Slack bot token: {}", config.webhook.slack.bot_token.status());
    println!("Completion API key: {}", config.commentary.api_key.status());
}

fn serve(config: Config) -> ExitCode {
    let _guard = match observability::init(&config.common) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        slack_token = config.webhook.slack.bot_token.status(),
        completion_api = config.commentary.api_key.status(),
        "Starting lossbot"
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(webhook::run(config.webhook, config.commentary)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Webhook server failed");
            ExitCode::FAILURE
        }
    }
}

fn analyze(config: Config, path: Option<PathBuf>) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let fetcher = HttpFetcher::new(reqwest::Client::new(), Credential::default());
    let calculator = Calculator::new(Arc::new(fetcher), config.webhook.default_source.clone());
    let (source, file_name) = match &path {
        Some(path) => (
            Source::Local(path.clone()),
            path.file_name().map(|name| name.to_string_lossy().into_owned()),
        ),
        None => (Source::Default, None),
    };

    let result = runtime.block_on(calculator.analyze(&source));
    let message = actuarial::format::render(
        &result,
        file_name.as_deref(),
        config.webhook.loss_ratio_threshold,
    );
    println!("{}", message.trim_end());

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
