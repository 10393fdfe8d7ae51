//! Types that mirror the agent's `/_stats` line and the alerts derived from it.

use std::fmt;

/// Number of comma-separated fields in one stats line.
pub const FIELD_COUNT: usize = 7;

/// One parsed stats snapshot. Field order matches the wire format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricVector {
    pub load_average: f64,
    pub mem_total: f64,
    pub mem_used: f64,
    pub disk_total: f64,
    pub disk_used: f64,
    // bytes/s
    pub net_total: f64,
    pub net_used: f64,
}

impl From<[f64; FIELD_COUNT]> for MetricVector {
    fn from(v: [f64; FIELD_COUNT]) -> Self {
        Self {
            load_average: v[0],
            mem_total: v[1],
            mem_used: v[2],
            disk_total: v[3],
            disk_used: v[4],
            net_total: v[5],
            net_used: v[6],
        }
    }
}

impl From<MetricVector> for [f64; FIELD_COUNT] {
    fn from(m: MetricVector) -> Self {
        [
            m.load_average,
            m.mem_total,
            m.mem_used,
            m.disk_total,
            m.disk_used,
            m.net_total,
            m.net_used,
        ]
    }
}

/// Which check produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Load,
    Memory,
    Disk,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
