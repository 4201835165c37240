//! Roster server entry point.
//!
//! # Responsibility
//! - Parse runtime configuration from flags and environment.
//! - Initialize logging, open the student database and serve HTTP until
//!   interrupted.

use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;
use roster_core::db::open_db;
use roster_core::{core_version, default_log_level, init_logging};
use roster_web::{create_router, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Student roster web application", version)]
struct Args {
    /// SQLite database file (created when missing)
    #[arg(long, env = "ROSTER_DB", default_value = "roster.sqlite3")]
    db: PathBuf,

    /// Listen address for HTTP
    #[arg(short, long, env = "ROSTER_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Log level: trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "ROSTER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when omitted
    #[arg(long, env = "ROSTER_LOG_DIR")]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, args.log_dir.as_deref()).map_err(|err| anyhow!(err))?;

    let conn = open_db(&args.db)
        .with_context(|| format!("failed to open database `{}`", args.db.display()))?;
    let app = create_router(AppState::new(conn));

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(
        "event=server_start module=cli status=ok addr={} version={}",
        args.bind,
        core_version()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
        })
        .await
        .context("http server failed")?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}
