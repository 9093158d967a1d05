//! Legion Server
//!
//! Axum server and CLI around the Legion pipeline. `legion run` drives a
//! single run in the terminal; `legion serve` exposes runs over HTTP + SSE.

mod api;
mod config;
mod state;
mod telemetry;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use legion_core::roster::{all_agents, AgentRole};
use legion_core::skills::LlmGenerationService;
use legion_core::swarm::{Coordinator, LogEntry, LogKind, RunEvent};
use legion_core::tools::render_markdown_report;
use tokio::{net::TcpListener, sync::mpsc};

use crate::config::PersistedConfig;
use crate::state::{AppState, SharedState};

#[derive(Parser, Clone)]
#[command(author, version, about = "Legion - Autonomous Multi-Agent Build Pipeline")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the Legion server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Run one pipeline in the terminal (no server)
    Run {
        /// Skip the pause between tasks
        #[arg(long)]
        headless: bool,
    },
    /// Print the agent roster
    Agents,
}

fn kind_icon(kind: LogKind) -> &'static str {
    match kind {
        LogKind::Info => "ℹ️ ",
        LogKind::Success => "✅",
        LogKind::Error => "❌",
        LogKind::Thinking => "💭",
    }
}

fn print_entry(entry: &LogEntry) {
    println!(
        "[{}] {} {}: {}",
        entry.timestamp.format("%H:%M:%S"),
        kind_icon(entry.kind),
        entry.agent_name,
        entry.message
    );
    if let Some(details) = &entry.details {
        for line in details.lines() {
            println!("           {}", line);
        }
    }
}

async fn run_cli(headless: bool) -> anyhow::Result<()> {
    let mut config = PersistedConfig::load().await.to_pipeline_config();
    if headless {
        config = config.headless();
    }
    let generator = Arc::new(LlmGenerationService::new(&config));

    let (event_tx, mut event_rx) = mpsc::channel::<RunEvent>(100);
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let RunEvent::Log { entry } = event {
                print_entry(&entry);
            }
        }
    });

    let mut coordinator = Coordinator::new(config, generator).with_event_channel(event_tx);

    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n🛑 Cancelling run...");
            cancel.cancel();
        }
    });

    let result = coordinator.start_run().await;
    let snapshot = coordinator.snapshot();
    drop(coordinator);
    let _ = printer.await;

    match result {
        Ok(report) => {
            println!("\n{}", render_markdown_report(&snapshot));
            println!(
                "✅ Run complete: {} completed, {} failed, {} skipped",
                report.completed, report.failed, report.skipped
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Run failed: {}", e);
            Err(e.into())
        }
    }
}

fn print_roster() {
    for agent in all_agents() {
        let rank = match agent.role {
            AgentRole::Ceo => "CEO",
            AgentRole::Cto => "CTO",
            AgentRole::Pm => "PM",
            AgentRole::Worker => "WORKER",
        };
        println!(
            "{} {:<16} {:<7} {:<28} {}",
            agent.icon, agent.id, rank, agent.specialty, agent.description
        );
    }
}

pub async fn run_server(port: u16) -> anyhow::Result<()> {
    let state: SharedState = Arc::new(AppState::new());
    let app = api::router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Legion server running at http://{}", addr);
    println!("🚀 Legion Server running at http://{}", addr);
    println!("   API v1 Routes:");
    println!("   Run:       /api/v1/run/status, /snapshot, /start, /stop, /events");
    println!("   Output:    /api/v1/run/artifacts, /report");
    println!("   Agents:    /api/v1/agents");
    println!("   Config:    /api/v1/config (GET, PATCH)");
    println!("   Providers: /api/v1/providers (GET)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Provider API keys: .legion/.env first, then a plain .env
    let _ = dotenvy::from_path(config::env_path());
    let _ = dotenvy::dotenv();

    telemetry::init_telemetry();

    let args = Args::parse();
    match args.command {
        Some(CliCommand::Run { headless }) => run_cli(headless).await,
        Some(CliCommand::Agents) => {
            print_roster();
            Ok(())
        }
        Some(CliCommand::Serve { port }) => run_server(port).await,
        None => run_server(8080).await,
    }
}
