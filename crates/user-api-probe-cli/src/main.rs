// crates/user-api-probe-cli/src/main.rs
// ============================================================================
// Module: User API Probe CLI Entry Point
// Description: Command dispatcher for probe runs and single API calls.
// Purpose: Run the probe suite against a target and inspect its endpoints.
// Dependencies: clap, serde, serde_jcs, thiserror, tokio, tracing, user-api-probe
// ============================================================================

//! ## Overview
//! The CLI resolves a [`ProbeConfig`] from defaults, an optional TOML file,
//! the environment, and global flags, then dispatches one subcommand. Logs go
//! to stderr; stdout carries only command output. `run` exits non-zero when
//! any probe case fails.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use user_api_probe::ApiResponse;
use user_api_probe::OutcomeStatus;
use user_api_probe::ProbeConfig;
use user_api_probe::ProbeKind;
use user_api_probe::ProbeSuite;
use user_api_probe::ReportWriter;
use user_api_probe::SuiteReport;
use user_api_probe::UserApi;
use user_api_probe::UserApiClient;
use user_api_probe::UserCreateRequest;
use user_api_probe::UserFixture;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "user-api-probe", version, disable_help_subcommand = true)]
struct Cli {
    /// TOML config file.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Base URL of the API under test (overrides config and environment).
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    timeout_secs: Option<u64>,
    /// Log filter directive (overrides `RUST_LOG`).
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the probe suite.
    Run(RunCommand),
    /// Send one create-user request.
    Create(CreateCommand),
    /// Fetch the user listing.
    List,
    /// Print a freshly generated unique fixture.
    Fixture,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Probe to run; repeat to select several. Defaults to all probes.
    #[arg(long = "probe", value_name = "NAME")]
    probes: Vec<ProbeKind>,
    /// Directory for `report.json`, `report.md`, and `transcript.json`.
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,
}

/// Arguments for `create`. Omitted fields are sent as null.
#[derive(Args, Debug)]
struct CreateCommand {
    /// Username to send.
    #[arg(long)]
    username: Option<String>,
    /// Email to send.
    #[arg(long)]
    email: Option<String>,
    /// Password to send.
    #[arg(long)]
    password: Option<String>,
}

impl CreateCommand {
    /// Builds the request payload.
    fn to_request(&self) -> UserCreateRequest {
        UserCreateRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// JSON shape printed by `create` and `list`.
#[derive(Debug, Serialize)]
struct ExchangeOutput<'a> {
    /// HTTP status.
    status: u16,
    /// Decoded body.
    body: &'a Value,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments, configures logging, and dispatches the command.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;
    let config = resolve_config(&cli)?;
    match cli.command {
        Commands::Run(command) => command_run(config, command).await,
        Commands::Create(command) => command_create(&config, &command).await,
        Commands::List => command_list(&config).await,
        Commands::Fixture => command_fixture(),
    }
}

/// Installs the stderr tracing subscriber.
fn init_tracing(log_level: Option<&str>) -> CliResult<()> {
    let filter = build_filter(log_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| CliError::new(format!("failed to initialize logging: {err}")))
}

/// Picks the log filter: flag, then `RUST_LOG`, then the default.
fn build_filter(log_level: Option<&str>) -> CliResult<EnvFilter> {
    match log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|err| CliError::new(format!("invalid log level `{directive}`: {err}"))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

/// Resolves configuration layers and applies global flag overrides.
fn resolve_config(cli: &Cli) -> CliResult<ProbeConfig> {
    let mut config = ProbeConfig::load(cli.config.as_deref()).map_err(config_error)?;
    if let Some(base_url) = &cli.base_url {
        config.override_base_url(base_url).map_err(config_error)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config.override_timeout_secs(secs).map_err(config_error)?;
    }
    Ok(config)
}

/// Builds the HTTP client for a config.
fn build_client(config: &ProbeConfig) -> CliResult<UserApiClient> {
    UserApiClient::new(config)
        .map_err(|err| CliError::new(format!("failed to build http client: {err}")))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `run`.
async fn command_run(config: ProbeConfig, command: RunCommand) -> CliResult<ExitCode> {
    let client = build_client(&config)?;
    let report = ProbeSuite::new(&client).with_selection(&command.probes).run().await;
    write_stdout_text(&render_summary(&report))?;

    let root = command
        .report_dir
        .or(config.run_root)
        .unwrap_or_else(ReportWriter::default_run_root);
    let writer = ReportWriter::new(root).map_err(report_error)?;
    writer.write_report(&report).map_err(report_error)?;
    writer.write_transcript(&client.transcript()).map_err(report_error)?;
    tracing::info!(dir = %writer.root().display(), "report written");

    Ok(if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes `create`.
async fn command_create(config: &ProbeConfig, command: &CreateCommand) -> CliResult<ExitCode> {
    let client = build_client(config)?;
    let response = client
        .create_user(&command.to_request())
        .await
        .map_err(|err| CliError::new(format!("create request failed: {err}")))?;
    write_exchange(&response)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `list`.
async fn command_list(config: &ProbeConfig) -> CliResult<ExitCode> {
    let client = build_client(config)?;
    let response = client
        .list_users()
        .await
        .map_err(|err| CliError::new(format!("list request failed: {err}")))?;
    write_exchange(&response)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `fixture`.
fn command_fixture() -> CliResult<ExitCode> {
    write_json(&UserFixture::unique())?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders one line per outcome plus a totals line.
fn render_summary(report: &SuiteReport) -> String {
    let mut output = String::new();
    for outcome in &report.outcomes {
        let mark = match outcome.status {
            OutcomeStatus::Passed => "PASS",
            OutcomeStatus::Failed => "FAIL",
        };
        output.push_str(&format!("{mark} {} [{}]", outcome.probe, outcome.case));
        if outcome.status == OutcomeStatus::Failed
            && let Some(detail) = &outcome.detail
        {
            output.push_str(&format!(": {detail}"));
        }
        output.push('\n');
    }
    output.push_str(&format!(
        "{} passed, {} failed ({} ms) against {}\n",
        report.passed(),
        report.failed(),
        report.duration_ms,
        report.base_url
    ));
    output
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes `{status, body}` for a response.
fn write_exchange(response: &ApiResponse) -> CliResult<()> {
    write_json(&ExchangeOutput {
        status: response.status,
        body: &response.body,
    })
}

/// Writes canonical JSON plus a newline to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_jcs::to_string(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes preformatted text to stdout.
fn write_stdout_text(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Maps a config error.
fn config_error(err: user_api_probe::ConfigError) -> CliError {
    CliError::new(format!("configuration error: {err}"))
}

/// Maps a report error.
fn report_error(err: user_api_probe::ReportError) -> CliError {
    CliError::new(format!("failed to write report: {err}"))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
