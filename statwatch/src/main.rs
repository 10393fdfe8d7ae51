//! Entry point for statwatch. Parses args and runs the poll loop.

use std::env;
use std::io;
use std::time::{Duration, Instant};

use anyhow::Context;
use statwatch::fetch::{HttpSource, DEFAULT_STATS_URL};
use statwatch::monitor::{Monitor, POLL_INTERVAL};
use tracing_subscriber::EnvFilter;

const DEMO_PORT: u16 = 3232;

struct ParsedArgs {
    url: Option<String>,
    once: bool,
    demo: bool,
}

fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--once] [--demo] [http://HOST:PORT/_stats]")
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "statwatch".into());
    let mut url: Option<String> = None;
    let mut once = false;
    let mut demo = false;

    for arg in it {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--once" => once = true,
            "--demo" => demo = true,
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown flag {arg}. {}", usage(&prog)));
            }
            _ => {
                if url.is_none() {
                    url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
            }
        }
    }
    Ok(ParsedArgs { url, once, demo })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    if parsed.demo {
        return run_demo_mode().await;
    }

    let url = parsed.url.unwrap_or_else(|| DEFAULT_STATS_URL.to_string());
    let source = HttpSource::new(url).context("building http client")?;

    if parsed.once {
        return run_once(source).await;
    }

    let mut monitor = Monitor::new(source);
    monitor.run(&mut io::stdout(), POLL_INTERVAL).await?;
    Ok(())
}

async fn run_once(source: HttpSource) -> anyhow::Result<()> {
    let url = source.url().to_string();
    let monitor = Monitor::new(source);
    let alerts = monitor
        .poll_once()
        .await
        .with_context(|| format!("polling {url}"))?;
    for alert in alerts {
        println!("{alert}");
    }
    Ok(())
}

// --- Demo Mode ---

async fn run_demo_mode() -> anyhow::Result<()> {
    let url = format!("http://127.0.0.1:{DEMO_PORT}/_stats");
    let child = spawn_demo_agent(DEMO_PORT).await?;
    let mut monitor = Monitor::new(HttpSource::new(url)?);
    let mut stdout = io::stdout();
    tokio::select! {
        res = monitor.run(&mut stdout, POLL_INTERVAL) => { drop(child); res?; Ok(()) }
        _ = tokio::signal::ctrl_c() => {
            // Drop child (kills agent) then return
            drop(child);
            Ok(())
        }
    }
}

struct DemoGuard(std::process::Child);
impl Drop for DemoGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

async fn spawn_demo_agent(port: u16) -> anyhow::Result<DemoGuard> {
    let candidate = find_agent_executable();
    let child = std::process::Command::new(&candidate)
        .arg("--port")
        .arg(port.to_string())
        .spawn()
        .with_context(|| format!("spawning {}", candidate.display()))?;
    let guard = DemoGuard(child);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    if !wait_for_listener(addr, Duration::from_secs(3)).await {
        tracing::warn!(%addr, "demo agent not accepting connections yet");
    }
    Ok(guard)
}

// Poll until something accepts TCP connections on `addr`, or `limit` passes.
async fn wait_for_listener(addr: std::net::SocketAddr, limit: Duration) -> bool {
    let start = Instant::now();
    loop {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        if start.elapsed() >= limit {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn find_agent_executable() -> std::path::PathBuf {
    if let Some(parent) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        #[cfg(windows)]
        let name = "statwatch_agent.exe";
        #[cfg(not(windows))]
        let name = "statwatch_agent";
        let candidate = parent.join(name);
        if candidate.exists() {
            return candidate;
        }
    }
    // Fallback to relying on PATH
    std::path::PathBuf::from("statwatch_agent")
}
