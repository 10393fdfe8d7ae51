//! Shared agent state: persistent sysinfo handles.

use std::sync::Arc;
use std::time::Instant;
use sysinfo::{Disks, MemoryRefreshKind, Networks, RefreshKind, System};
use tokio::sync::Mutex;

pub type SharedSystem = Arc<Mutex<System>>;
pub type SharedDisks = Arc<Mutex<Disks>>;
pub type SharedNet = Arc<Mutex<NetSampler>>;

/// Networks handle plus the time of its last refresh, so deltas become rates.
pub struct NetSampler {
    pub nets: Networks,
    pub last: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub sys: SharedSystem,
    pub disks: SharedDisks,
    pub net: SharedNet,
}

impl AppState {
    pub fn new() -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );
        // Keep Networks alive across requests so received()/transmitted() deltas work
        let nets = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
            net: Arc::new(Mutex::new(NetSampler {
                nets,
                last: Instant::now(),
            })),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
