//! Threshold checks over a parsed snapshot.
//!
//! All four checks run on every snapshot and emit in a fixed order:
//! load, memory, disk, network. Each comparison is a strict `>`; a total
//! of zero skips its check instead of dividing by it.

use crate::types::{Alert, AlertKind, MetricVector};

pub const LOAD_AVG_THRESHOLD: f64 = 30.0;
pub const MEM_USAGE_THRESHOLD: f64 = 0.8;
pub const DISK_USAGE_THRESHOLD: f64 = 0.9;
pub const NET_USAGE_THRESHOLD: f64 = 0.9;

pub const BYTES_IN_MB: u64 = 1024 * 1024;

/// How the load average is rendered in its alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadFormat {
    /// `35.7` -> `35`
    #[default]
    Truncate,
    /// `35.7` -> `35.70`
    TwoDecimals,
}

/// How free bandwidth (bytes/s) is turned into the Mbit/s figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandwidthUnit {
    /// bytes * 8 / 1024^2
    #[default]
    MebibitsFromBytes,
    /// bytes / 1_000_000, no bit conversion
    DecimalMegabytes,
}

impl BandwidthUnit {
    /// Whole Mbit/s, rounded to nearest.
    pub fn to_mbit(self, bytes_per_sec: f64) -> u64 {
        let v = match self {
            BandwidthUnit::MebibitsFromBytes => bytes_per_sec * 8.0 / BYTES_IN_MB as f64,
            BandwidthUnit::DecimalMegabytes => bytes_per_sec / 1_000_000.0,
        };
        v.round() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policy {
    pub load_format: LoadFormat,
    pub bandwidth_unit: BandwidthUnit,
}

/// Run all four checks and return their alerts in load, memory, disk, network order.
pub fn check_thresholds(m: &MetricVector, policy: &Policy) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if m.load_average > LOAD_AVG_THRESHOLD {
        let v = match policy.load_format {
            LoadFormat::Truncate => format!("{}", m.load_average.trunc() as i64),
            LoadFormat::TwoDecimals => format!("{:.2}", m.load_average),
        };
        alerts.push(Alert::new(
            AlertKind::Load,
            format!("Load Average is too high: {v}"),
        ));
    }

    if m.mem_total > 0.0 && m.mem_used / m.mem_total > MEM_USAGE_THRESHOLD {
        // used*100/total keeps 90% at exactly 90 instead of 89.999..
        let percent = (m.mem_used * 100.0 / m.mem_total) as u64;
        alerts.push(Alert::new(
            AlertKind::Memory,
            format!("Memory usage too high: {percent}%"),
        ));
    }

    if m.disk_total > 0.0 && m.disk_used / m.disk_total > DISK_USAGE_THRESHOLD {
        let free_bytes = (m.disk_total - m.disk_used).max(0.0) as u64;
        let free_mb = free_bytes / BYTES_IN_MB;
        alerts.push(Alert::new(
            AlertKind::Disk,
            format!("Free disk space is too low: {free_mb} Mb left"),
        ));
    }

    if m.net_total > 0.0 && m.net_used / m.net_total > NET_USAGE_THRESHOLD {
        let free_bytes_per_sec = (m.net_total - m.net_used).max(0.0);
        let free_mbit = policy.bandwidth_unit.to_mbit(free_bytes_per_sec);
        alerts.push(Alert::new(
            AlertKind::Network,
            format!("Network bandwidth usage high: {free_mbit} Mbit/s available"),
        ));
    }

    alerts
}
