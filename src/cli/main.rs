//! Background Removal Client CLI
//!
//! Terminal front end that drives the workflow controller against a live
//! background removal service.

use super::commands::{Command, HELP};
use super::config::{resolve_output_path, CliConfigBuilder};
use crate::{
    config::DEFAULT_SERVER_URL,
    controller::{Event, Outcome, WorkflowController},
    format::format_file_size,
    session::Phase,
    tracing_config::{events, init_cli_tracing, spans, TracingFormat},
    transport::{HttpTransport, NETWORK_ERROR_MESSAGE},
    types::SelectedFile,
    ClientConfig,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, Instrument};

/// Background removal client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-client")]
pub struct Cli {
    /// Image to process (PNG, JPEG or WebP, up to 10MB)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Save the processed image to this file or directory
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Read commands from stdin instead of processing a single image
    #[arg(short, long)]
    pub interactive: bool,

    /// Base URL of the background removal service
    #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Per-request timeout in seconds (0 = no timeout)
    #[arg(long, default_value_t = 0)]
    pub timeout: u64,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::Console)]
    pub log_format: TracingFormat,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose, cli.log_format).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    info!(server = %config.server_url, "Starting background removal client");

    let mut session = TerminalSession::new(&config)?;
    let mode = if cli.interactive { "interactive" } else { "one-shot" };

    async move {
        if cli.interactive {
            if let Some(input) = &cli.input {
                session.open(input).await;
            }
            session.run_interactive().await
        } else {
            let input = cli
                .input
                .as_deref()
                .context("An input image is required unless --interactive is given")?;
            session.run_once(input, cli.output.as_deref()).await
        }
    }
    .instrument(spans::session(&config.server_url, mode))
    .await
}

/// Controller plus the terminal rendering around it
struct TerminalSession {
    controller: WorkflowController,
    transport: Arc<HttpTransport>,
}

impl TerminalSession {
    fn new(config: &ClientConfig) -> Result<Self> {
        let transport =
            Arc::new(HttpTransport::new(config).context("Failed to create HTTP transport")?);
        let controller = WorkflowController::new(transport.clone(), config);
        Ok(Self {
            controller,
            transport,
        })
    }

    /// Upload one image, remove its background and optionally save it
    async fn run_once(&mut self, input: &Path, output: Option<&Path>) -> Result<()> {
        let outcome = self.open(input).await;
        if outcome.phase() != Phase::Preview {
            anyhow::bail!("{}", self.failure_message(&outcome));
        }

        let outcome = self.remove().await;
        if outcome.phase() != Phase::Result {
            anyhow::bail!("{}", self.failure_message(&outcome));
        }

        if let Some(output) = output {
            self.download(Some(output)).await?;
        }

        Ok(())
    }

    async fn run_interactive(&mut self) -> Result<()> {
        println!("🎨 Background removal client ({})", self.transport.base_url());
        println!("Type 'help' for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print_prompt(self.controller.phase());
            let Some(line) = lines.next_line().await.context("Failed to read command")? else {
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    eprintln!("⚠️  {}", message);
                    continue;
                },
            };
            debug!(command = ?command, "Interactive command");

            match command {
                Command::Open(path) => {
                    self.open(&path).await;
                },
                Command::Remove => {
                    self.remove().await;
                },
                Command::Download(path) => {
                    if let Err(e) = self.download(path.as_deref()).await {
                        events::error_with_context(&*e, "download");
                        eprintln!("❌ {:#}", e);
                    }
                },
                Command::Status => self.print_status(),
                Command::Help => println!("{}", HELP),
                Command::Quit => break,
                other => {
                    if let Some(event) = other.event() {
                        let outcome = self.controller.dispatch(event).await;
                        self.render(&outcome);
                    }
                },
            }
        }

        Ok(())
    }

    async fn open(&mut self, path: &Path) -> Outcome {
        let span = spans::file_selection(path);
        self.open_inner(path).instrument(span).await
    }

    async fn open_inner(&mut self, path: &Path) -> Outcome {
        let file = match SelectedFile::from_path(path).await {
            Ok(file) => file,
            Err(e) => {
                eprintln!("❌ {}", e);
                return Outcome::Rejected {
                    phase: self.controller.phase(),
                    message: e.to_string(),
                };
            },
        };

        println!(
            "📤 Uploading {} ({})",
            file.name,
            format_file_size(file.size)
        );
        let outcome = self.controller.dispatch(Event::FileSelected(file)).await;
        self.render(&outcome);
        outcome
    }

    async fn remove(&mut self) -> Outcome {
        let mut phases = self.controller.subscribe();
        let spinner = processing_spinner();

        let outcome = {
            let dispatch = self.controller.dispatch(Event::RemoveBackground);
            tokio::pin!(dispatch);
            loop {
                tokio::select! {
                    outcome = &mut dispatch => break outcome,
                    Ok(()) = phases.changed() => {
                        if *phases.borrow_and_update() == Phase::Processing {
                            spinner.enable_steady_tick(Duration::from_millis(100));
                            spinner.set_message("Removing background...");
                        }
                    }
                }
            }
        };

        spinner.finish_and_clear();
        self.render(&outcome);
        outcome
    }

    /// Follow the download link of the current result and save the bytes
    async fn download(&mut self, requested: Option<&Path>) -> Result<()> {
        let outcome = self.controller.dispatch(Event::Download).await;
        let Some(output_filename) = self
            .controller
            .session()
            .output_filename()
            .map(str::to_string)
            .filter(|_| matches!(outcome, Outcome::Unchanged(Phase::Result)))
        else {
            anyhow::bail!("Nothing to download yet; remove a background first");
        };

        let bytes = self
            .transport
            .download(&output_filename)
            .await
            .with_context(|| format!("Failed to download {}", output_filename))?;

        let path = resolve_output_path(requested, &output_filename);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        println!(
            "💾 Saved {} ({})",
            path.display(),
            format_file_size(bytes.len() as u64)
        );
        Ok(())
    }

    fn render(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Transitioned { to: Phase::Preview, .. } => {
                if let Some(summary) = &self.controller.view().preview {
                    println!("🖼️  Preview\n{}", indent(&summary.to_string()));
                }
            },
            Outcome::Transitioned { to: Phase::Result, .. } => {
                if let Some(summary) = &self.controller.view().result {
                    println!("✅ Background removed\n{}", indent(&summary.to_string()));
                    self.print_links(&summary.output_filename);
                }
            },
            Outcome::Transitioned { to, .. } | Outcome::Unchanged(to) => {
                debug!(phase = %to, "Phase after event");
                if *to == Phase::Upload {
                    println!("🔄 {}", to.description());
                }
            },
            Outcome::Rejected { message, .. } => {
                eprintln!("❌ {}", message);
                if message == NETWORK_ERROR_MESSAGE {
                    events::warning_with_recommendation(
                        "The service could not be reached or answered unexpectedly",
                        &format!("check that it is running at {}", self.transport.base_url()),
                    );
                }
            },
            Outcome::Ignored { phase, kind } => {
                eprintln!(
                    "⚠️  {:?} is not available in the {} step",
                    kind, phase
                );
            },
        }
    }

    fn print_links(&self, output_filename: &str) {
        if let Ok(url) = self.transport.preview_url(output_filename) {
            println!("   Preview:  {}", url);
        }
        if let Ok(url) = self.transport.download_url(output_filename) {
            println!("   Download: {}", url);
        }
    }

    fn print_status(&self) {
        let session = self.controller.session();
        println!("📋 {}", session.phase().description());
        if let Some(source) = session.source_filename() {
            println!("   Uploaded as: {}", source);
        }
        if let Some(output) = session.output_filename() {
            println!("   Result:      {}", output);
        }
        if let Some(message) = self.controller.error_message() {
            println!("   Error:       {}", message);
        }
    }

    fn failure_message(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Rejected { message, .. } => message.clone(),
            other => format!("Workflow stopped at {} ({:?})", other.phase(), other),
        }
    }
}

fn processing_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner
}

fn print_prompt(phase: Phase) {
    if let Err(e) = write_prompt(&mut std::io::stdout().lock(), phase) {
        debug!(error = %e, "Failed to write prompt");
    }
}

fn write_prompt<W: std::io::Write>(out: &mut W, phase: Phase) -> std::io::Result<()> {
    write!(out, "[{}]> ", phase)?;
    out.flush()
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("   {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
