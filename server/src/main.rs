use anyhow::Result;
use axum::Router;
use clap::Parser;
use retrieval_core::{BuildConfig, MissingIdPolicy};
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Collection path (file or directory), indexed once at startup
    #[arg(long, default_value = "./data")]
    data: PathBuf,
    /// Abort startup if any document lacks a DOCNO field instead of skipping it
    #[arg(long, default_value_t = false)]
    strict_docno: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let missing_id = if args.strict_docno { MissingIdPolicy::Fail } else { MissingIdPolicy::Skip };
    let config = BuildConfig { missing_id, ..BuildConfig::default() };
    let app: Router = build_app(args.data.clone(), &config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
