//! tether — a terminal chat client bridging an LLM with MCP tool servers.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tether_api::OpenAiProvider;
use tether_core::{Orchestrator, QueryEvent};
use tether_mcp::{ServersFile, ToolGateway};
use tether_types::{Provider, ToolDispatcher};

/// Model requested for every completion.
const MODEL: &str = "llama-3.3-70b-versatile";

/// Base URL of the OpenAI-compatible completions endpoint.
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Environment variable holding the API credential.
const API_KEY_VAR: &str = "LLM_API_KEY";

#[derive(Parser)]
#[command(
    name = "tether",
    version,
    about = "A terminal chat client bridging an LLM with MCP tool servers"
)]
struct Cli {
    /// Path to the tool server registry
    #[arg(long, default_value = "servers.toml")]
    servers: std::path::PathBuf,

    /// Enable verbose/debug logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let registry = ServersFile::load(&cli.servers).with_context(|| {
        format!("failed to load server registry from {}", cli.servers.display())
    })?;

    // Absence is deliberately not checked here; an empty key surfaces as an
    // authentication failure on the first completion request.
    let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
    let provider =
        OpenAiProvider::new(api_key, API_BASE_URL).context("failed to create API client")?;

    let gateway = ToolGateway::connect_all(&registry)
        .await
        .context("failed to start tool servers")?;

    eprintln!(
        "tether v{} (model: {MODEL}, servers: {}, tools: {})",
        env!("CARGO_PKG_VERSION"),
        gateway.server_count(),
        gateway.tool_count()
    );
    eprintln!("Type your message. Enter \"quit\" to exit.\n");

    let gateway = Arc::new(gateway);
    let orchestrator = Orchestrator::new(
        Arc::new(provider) as Arc<dyn Provider>,
        Arc::clone(&gateway) as Arc<dyn ToolDispatcher>,
        MODEL,
    );

    let outcome = chat_loop(&orchestrator).await;

    // Teardown runs on every exit path, before the outcome is surfaced.
    drop(orchestrator);
    match Arc::try_unwrap(gateway) {
        Ok(gateway) => gateway.shutdown().await,
        Err(_) => tracing::warn!("gateway still referenced at shutdown; skipping teardown"),
    }

    outcome
}

/// Read-eval-print loop. The first error in an iteration ends the loop.
async fn chat_loop(orchestrator: &Orchestrator) -> Result<()> {
    let stdin = io::stdin();

    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            eprintln!();
            return Ok(());
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if is_quit(input) {
            return Ok(());
        }

        let answer = orchestrator.process_query(input, print_event).await?;
        println!("{answer}\n");
    }
}

/// The sentinel that ends the session, case-insensitively.
fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("quit")
}

fn print_event(event: QueryEvent) {
    match event {
        QueryEvent::ToolCall { name, arguments } => eprintln!("  [tool {name} {arguments}]"),
        QueryEvent::ToolResult { name } => eprintln!("  [tool {name} done]"),
    }
}
