// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use clap::Parser;
use readiness_scanner::app::{create_router, AppState, VERSION};
use readiness_scanner::services::gemini::GeminiClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "readiness-scanner", version = VERSION)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "SCANNER_BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let http = reqwest::Client::builder()
        .user_agent(format!("readiness-scanner/{VERSION}"))
        .build()?;

    let gemini = GeminiClient::from_env(http.clone()).map(Arc::new);

    let app = create_router(AppState { http, gemini });

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("readiness-scanner v{} listening on {}", VERSION, args.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
