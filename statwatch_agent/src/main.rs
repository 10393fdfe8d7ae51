//! statwatch_agent: serves this host's stats line at GET /_stats.

mod http;
mod metrics;
mod state;
mod types;

use std::net::SocketAddr;

use anyhow::Context;
use state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 3000;

/// `--port N`, `-p N` or `--port=N`; the last one given wins.
fn parse_port<I: IntoIterator<Item = String>>(args: I) -> Result<u16, String> {
    let mut it = args.into_iter().skip(1);
    let mut port = DEFAULT_PORT;
    while let Some(arg) = it.next() {
        let value = match arg.as_str() {
            "--port" | "-p" => it.next().ok_or_else(|| format!("{arg} needs a value"))?,
            _ => match arg.strip_prefix("--port=") {
                Some(v) => v.to_string(),
                None => continue,
            },
        };
        port = value
            .parse()
            .map_err(|_| format!("invalid port {value:?}"))?;
    }
    Ok(port)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = parse_port(std::env::args()).map_err(anyhow::Error::msg)?;
    let app = http::router(AppState::new());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("statwatch_agent serving http://{}/_stats", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
