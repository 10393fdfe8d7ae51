//! Stats collection using sysinfo for statwatch_agent.

use crate::state::AppState;
use crate::types::StatsSample;
use once_cell::sync::OnceCell;
use std::time::{Duration, Instant};
use sysinfo::System;
use tracing::warn;

// 1 Gbit/s
const DEFAULT_LINK_BYTES: u64 = 125_000_000;

// Link capacity in bytes/s, read once. Override with STATWATCH_AGENT_LINK_BYTES.
fn link_capacity_bytes() -> u64 {
    static CAP: OnceCell<u64> = OnceCell::new();
    *CAP.get_or_init(|| match std::env::var("STATWATCH_AGENT_LINK_BYTES") {
        Ok(v) => match v.trim().parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!(value = %v, "ignoring invalid STATWATCH_AGENT_LINK_BYTES");
                DEFAULT_LINK_BYTES
            }
        },
        Err(_) => DEFAULT_LINK_BYTES,
    })
}

pub async fn collect_stats(state: &AppState) -> StatsSample {
    let load_average = System::load_average().one;

    let (mem_total, mem_used) = {
        let mut sys = state.sys.lock().await;
        sys.refresh_memory();
        (sys.total_memory(), sys.used_memory())
    };

    let (disk_total, disk_used) = {
        let mut disks = state.disks.lock().await;
        disks.refresh(true);
        disk_totals(
            disks
                .list()
                .iter()
                .map(|d| (d.total_space(), d.available_space())),
        )
    };

    let net_used = {
        let mut net = state.net.lock().await;
        net.nets.refresh(true);
        let now = Instant::now();
        let elapsed = now.duration_since(net.last);
        net.last = now;
        let delta = net
            .nets
            .iter()
            .map(|(_, data)| data.received().saturating_add(data.transmitted()))
            .fold(0u64, u64::saturating_add);
        bytes_per_sec(delta, elapsed)
    };

    StatsSample {
        load_average,
        mem_total,
        mem_used,
        disk_total,
        disk_used,
        net_total: link_capacity_bytes(),
        net_used,
    }
}

/// Sum (total, used) over `(total, available)` pairs. Zero-sized pseudo mounts are skipped;
/// full disks (available == 0) are kept.
fn disk_totals<I: IntoIterator<Item = (u64, u64)>>(disks: I) -> (u64, u64) {
    disks
        .into_iter()
        .filter(|(total, _)| *total > 0)
        .fold((0u64, 0u64), |(t, u), (total, available)| {
            (
                t.saturating_add(total),
                u.saturating_add(total.saturating_sub(available)),
            )
        })
}

fn bytes_per_sec(delta: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64().max(1e-3);
    (delta as f64 / secs).round() as u64
}
