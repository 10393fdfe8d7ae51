//! Poll loop: fetch, parse, evaluate, and track consecutive failures.

use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::evaluate::{check_thresholds, Policy};
use crate::fetch::{FetchError, StatsSource};
use crate::parse::{parse_stats, ParseError};
use crate::types::Alert;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Consecutive failed cycles before the unavailable notice is printed.
pub const FAILURE_THRESHOLD: u32 = 3;

pub const UNAVAILABLE_NOTICE: &str = "Unable to fetch server statistic";

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("malformed stats: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Healthy,
    Degraded(u32),
}

/// Counts failed cycles since the last success.
#[derive(Debug, Default)]
pub struct FailureCounter {
    count: u32,
}

impl FailureCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.count = 0;
    }

    /// Returns true only on the failure that brings the count to the threshold.
    pub fn record_failure(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.count == FAILURE_THRESHOLD
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn state(&self) -> Health {
        match self.count {
            0 => Health::Healthy,
            n => Health::Degraded(n),
        }
    }
}

pub struct Monitor<S> {
    source: S,
    failures: FailureCounter,
    policy: Policy,
}

impl<S: StatsSource> Monitor<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, Policy::default())
    }

    pub fn with_policy(source: S, policy: Policy) -> Self {
        Self {
            source,
            failures: FailureCounter::new(),
            policy,
        }
    }

    pub fn health(&self) -> Health {
        self.failures.state()
    }

    /// One fetch -> parse -> evaluate cycle. Does not touch the failure count.
    pub async fn poll_once(&self) -> Result<Vec<Alert>, PollError> {
        let body = self.source.fetch().await?;
        let metrics = parse_stats(&body)?;
        Ok(check_thresholds(&metrics, &self.policy))
    }

    /// Run one cycle and return the lines it produces.
    pub async fn step(&mut self) -> Vec<String> {
        match self.poll_once().await {
            Ok(alerts) => {
                self.failures.record_success();
                alerts.into_iter().map(|a| a.message).collect()
            }
            Err(e) => {
                let crossed = self.failures.record_failure();
                debug!(error = %e, failures = self.failures.count(), "poll cycle failed");
                if crossed {
                    info!(failures = self.failures.count(), "stats unavailable");
                    vec![UNAVAILABLE_NOTICE.to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Poll forever, writing each produced line to `out`.
    pub async fn run<W: Write>(&mut self, out: &mut W, interval: Duration) -> std::io::Result<()> {
        loop {
            for line in self.step().await {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
            sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // Replays scripted responses; `None` stands for a failed request.
    struct Scripted(Mutex<VecDeque<Option<&'static str>>>);

    impl Scripted {
        fn new(items: &[Option<&'static str>]) -> Self {
            Self(Mutex::new(items.iter().copied().collect()))
        }
    }

    impl StatsSource for Scripted {
        async fn fetch(&self) -> Result<String, FetchError> {
            let next = self.0.lock().unwrap().pop_front().flatten();
            next.map(str::to_string)
                .ok_or(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    const OK: Option<&str> = Some("10,1000,100,1000,100,1000,100");
    const HOT: Option<&str> = Some("35,1000,900,1000,950,1000,950");

    #[test]
    fn counter_fires_once_on_crossing() {
        let mut c = FailureCounter::new();
        assert_eq!(c.state(), Health::Healthy);
        assert!(!c.record_failure());
        assert!(!c.record_failure());
        assert!(c.record_failure());
        assert!(!c.record_failure());
        assert_eq!(c.state(), Health::Degraded(4));
        c.record_success();
        assert_eq!(c.state(), Health::Healthy);
        assert!(!c.record_failure());
        assert!(!c.record_failure());
        assert!(c.record_failure());
    }

    #[tokio::test]
    async fn success_prints_alerts_in_order() {
        let mut m = Monitor::new(Scripted::new(&[HOT]));
        let lines = m.step().await;
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Load Average is too high"));
        assert!(lines[1].starts_with("Memory usage too high"));
        assert!(lines[2].starts_with("Free disk space is too low"));
        assert!(lines[3].starts_with("Network bandwidth usage high"));
        assert_eq!(m.health(), Health::Healthy);
    }

    #[tokio::test]
    async fn healthy_snapshot_prints_nothing() {
        let mut m = Monitor::new(Scripted::new(&[OK]));
        assert!(m.step().await.is_empty());
        assert_eq!(m.health(), Health::Healthy);
    }

    #[tokio::test]
    async fn third_failure_prints_single_notice() {
        let mut m = Monitor::new(Scripted::new(&[None, None, None, None, None]));
        assert!(m.step().await.is_empty());
        assert!(m.step().await.is_empty());
        assert_eq!(m.health(), Health::Degraded(2));
        assert_eq!(m.step().await, vec![UNAVAILABLE_NOTICE.to_string()]);
        assert!(m.step().await.is_empty());
        assert!(m.step().await.is_empty());
        assert_eq!(m.health(), Health::Degraded(5));
    }

    #[tokio::test]
    async fn malformed_payload_counts_as_failure() {
        let mut m = Monitor::new(Scripted::new(&[
            Some("1,2,3"),
            Some("a,b,c,d,e,f,g"),
            Some(""),
        ]));
        assert!(m.step().await.is_empty());
        assert!(m.step().await.is_empty());
        assert_eq!(m.step().await, vec![UNAVAILABLE_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn success_resets_the_count() {
        let mut m = Monitor::new(Scripted::new(&[None, OK, None, None, None]));
        m.step().await;
        assert_eq!(m.health(), Health::Degraded(1));
        m.step().await;
        assert_eq!(m.health(), Health::Healthy);
        assert!(m.step().await.is_empty());
        assert!(m.step().await.is_empty());
        assert_eq!(m.health(), Health::Degraded(2));
        assert_eq!(m.step().await, vec![UNAVAILABLE_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn poll_once_reports_the_failing_stage() {
        let m = Monitor::new(Scripted::new(&[None, Some("1,2")]));
        assert!(matches!(m.poll_once().await, Err(PollError::Fetch(_))));
        assert!(matches!(
            m.poll_once().await,
            Err(PollError::Parse(ParseError::FieldCount(2)))
        ));
        assert_eq!(m.health(), Health::Healthy);
    }
}
