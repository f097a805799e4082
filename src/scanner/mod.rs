//! Scanner module - fans probes out across a subnet and collects the results.
//!
//! One tokio task is spawned per address. Every task delivers exactly one
//! [`ProbeResult`] into a channel sized to the whole address list, and the
//! coordinator waits for every task before closing and draining it.

pub mod tcp;
pub mod traits;

use crate::error::ScanResult;
use crate::subnet::enumerate;
use crate::types::{NetworkBlock, Port};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

pub use tcp::{TcpConnectProber, DEFAULT_TIMEOUT};
pub use traits::{ProbeResult, Prober};

/// Stage of a scan run.
///
/// A run moves `Enumerating -> Probing -> Collected`; only enumeration can
/// fail, and it does so before any probe is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Enumerating,
    Probing,
    Collected,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumerating => write!(f, "enumerating"),
            Self::Probing => write!(f, "probing"),
            Self::Collected => write!(f, "collected"),
        }
    }
}

/// Every probe result of one scan, sorted by address.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    results: Vec<ProbeResult>,
    duration: Duration,
}

impl ScanOutcome {
    fn new(mut results: Vec<ProbeResult>, duration: Duration) -> Self {
        results.sort_by_key(|r| r.address);
        Self { results, duration }
    }

    /// All results, one per scanned address.
    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    /// Results for hosts that accepted the connection.
    pub fn reachable(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| r.reachable)
    }

    pub fn reachable_count(&self) -> usize {
        self.reachable().count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Wall-clock time from the first spawn to the last delivery.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn into_results(self) -> Vec<ProbeResult> {
        self.results
    }
}

/// Runs one probe per address and gathers the results.
pub struct ScanCoordinator {
    prober: Arc<dyn Prober>,
    concurrency: usize,
    progress: Option<ProgressBar>,
}

impl ScanCoordinator {
    /// Create a coordinator with unlimited fan-out.
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            concurrency: 0,
            progress: None,
        }
    }

    /// Cap the number of probes in flight. 0 means no cap.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Show a progress bar that advances as results arrive.
    pub fn with_progress(mut self) -> Self {
        let pb = ProgressBar::hidden();
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        self.progress = Some(pb);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Probe every address on `port` and wait for all of them.
    ///
    /// The outcome always holds exactly `addresses.len()` results, whatever
    /// order the probes complete in.
    pub async fn scan(&self, addresses: &[Ipv4Addr], port: Port) -> ScanOutcome {
        let start = Instant::now();
        let total = addresses.len();
        info!(phase = %ScanPhase::Probing, hosts = total, %port, "launching probes");

        if total == 0 {
            info!(phase = %ScanPhase::Collected, results = 0, "nothing to probe");
            return ScanOutcome::new(Vec::new(), start.elapsed());
        }

        if let Some(pb) = &self.progress {
            pb.set_length(total as u64);
            pb.set_position(0);
            pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        }

        // Capacity covers every result, so no task ever waits to deliver.
        let (tx, mut rx) = mpsc::channel::<ProbeResult>(total);
        let limiter = (self.concurrency > 0).then(|| Arc::new(Semaphore::new(self.concurrency)));

        let handles: Vec<_> = addresses
            .iter()
            .map(|&address| {
                let tx = tx.clone();
                let prober = Arc::clone(&self.prober);
                let limiter = limiter.clone();
                let progress = self.progress.clone();

                tokio::spawn(async move {
                    let _permit = match &limiter {
                        Some(sem) => sem.acquire().await.ok(),
                        None => None,
                    };

                    let result = prober.probe(address, port).await;

                    if let Some(pb) = &progress {
                        pb.inc(1);
                        if result.reachable {
                            pb.set_message(format!("found {}", address));
                        }
                    }

                    // The receiver outlives every task.
                    let _ = tx.send(result).await;
                })
            })
            .collect();

        let joined = join_all(handles).await;
        drop(tx);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        // A task that died never delivered; count its host as unreachable.
        if results.len() < total {
            let delivered: HashSet<Ipv4Addr> = results.iter().map(|r| r.address).collect();
            for (&address, outcome) in addresses.iter().zip(joined) {
                if let Err(e) = outcome {
                    if !delivered.contains(&address) {
                        warn!(%address, error = %e, "probe task failed");
                        results.push(ProbeResult::unreachable(address, port));
                    }
                }
            }
        }

        if let Some(pb) = &self.progress {
            pb.finish_with_message("scan complete");
        }

        let outcome = ScanOutcome::new(results, start.elapsed());
        info!(
            phase = %ScanPhase::Collected,
            results = outcome.len(),
            reachable = outcome.reachable_count(),
            elapsed_ms = outcome.duration().as_millis() as u64,
            "probes finished"
        );
        outcome
    }
}

/// Enumerate `block` and probe every address in it.
pub async fn run_scan(
    block: &NetworkBlock,
    port: Port,
    coordinator: &ScanCoordinator,
) -> ScanResult<ScanOutcome> {
    info!(phase = %ScanPhase::Enumerating, %block, "enumerating subnet");
    let addresses = enumerate(block)?;
    Ok(coordinator.scan(&addresses, port).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports hosts with an even last octet as reachable, after a delay
    /// that makes completion order differ from address order.
    struct FakeProber {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FakeProber {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, address: Ipv4Addr, port: Port) -> ProbeResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let last = address.octets()[3];
            tokio::time::sleep(Duration::from_millis(u64::from(255 - last) % 17)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if last % 2 == 0 {
                ProbeResult::reachable(address, port)
            } else {
                ProbeResult::unreachable(address, port)
            }
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(50)
        }
    }

    /// Panics on one address to exercise the lost-task path.
    struct PanickingProber;

    #[async_trait]
    impl Prober for PanickingProber {
        async fn probe(&self, address: Ipv4Addr, port: Port) -> ProbeResult {
            if address.octets()[3] == 1 {
                panic!("probe blew up");
            }
            ProbeResult::reachable(address, port)
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(10)
        }
    }

    fn ssh() -> Port {
        Port::new(22).unwrap()
    }

    #[test]
    fn test_scan_phase_display() {
        assert_eq!(ScanPhase::Enumerating.to_string(), "enumerating");
        assert_eq!(ScanPhase::Probing.to_string(), "probing");
        assert_eq!(ScanPhase::Collected.to_string(), "collected");
    }

    #[tokio::test]
    async fn test_scan_collects_one_result_per_address() {
        let prober = Arc::new(FakeProber::new());
        let coordinator = ScanCoordinator::new(prober.clone());
        let addresses = enumerate(&"10.0.0.0/26".parse().unwrap()).unwrap();

        let outcome = coordinator.scan(&addresses, ssh()).await;

        assert_eq!(outcome.len(), addresses.len());
        assert_eq!(prober.calls.load(Ordering::SeqCst), addresses.len());
        assert_eq!(outcome.reachable_count(), 32);
        assert!(outcome.reachable().all(|r| r.address.octets()[3] % 2 == 0));

        let scanned: Vec<Ipv4Addr> = outcome.results().iter().map(|r| r.address).collect();
        assert_eq!(scanned, addresses);
        assert!(outcome.results().iter().all(|r| r.port == ssh()));
    }

    #[tokio::test]
    async fn test_scan_of_empty_list() {
        let coordinator = ScanCoordinator::new(Arc::new(FakeProber::new()));
        let outcome = coordinator.scan(&[], ssh()).await;
        assert!(outcome.is_empty());
        assert_eq!(outcome.reachable_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrency_cap_bounds_in_flight_probes() {
        let prober = Arc::new(FakeProber::new());
        let coordinator = ScanCoordinator::new(prober.clone()).with_concurrency(4);
        assert_eq!(coordinator.concurrency(), 4);
        let addresses = enumerate(&"192.168.7.0/27".parse().unwrap()).unwrap();

        let outcome = coordinator.scan(&addresses, ssh()).await;

        assert_eq!(outcome.len(), 32);
        assert_eq!(outcome.reachable_count(), 16);
        assert!(prober.peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_capped_and_uncapped_scans_agree() {
        let addresses = enumerate(&"172.16.3.0/28".parse().unwrap()).unwrap();
        let open = ScanCoordinator::new(Arc::new(FakeProber::new()))
            .scan(&addresses, ssh())
            .await;
        let capped = ScanCoordinator::new(Arc::new(FakeProber::new()))
            .with_concurrency(1)
            .scan(&addresses, ssh())
            .await;
        assert_eq!(open.results(), capped.results());
    }

    #[tokio::test]
    async fn test_failed_task_still_counts() {
        let coordinator = ScanCoordinator::new(Arc::new(PanickingProber));
        let addresses = enumerate(&"10.0.0.0/30".parse().unwrap()).unwrap();

        let outcome = coordinator.scan(&addresses, ssh()).await;

        assert_eq!(outcome.len(), 4);
        let failed = &outcome.results()[1];
        assert_eq!(failed.address, Ipv4Addr::new(10, 0, 0, 1));
        assert!(!failed.reachable);
        assert_eq!(outcome.reachable_count(), 3);
    }

    #[tokio::test]
    async fn test_run_scan_against_localhost() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let prober = Arc::new(TcpConnectProber::new(Duration::from_secs(2)));
        let coordinator = ScanCoordinator::new(prober);
        let block: NetworkBlock = "127.0.0.1/32".parse().unwrap();

        let outcome = run_scan(&block, port, &coordinator).await.unwrap();

        assert_eq!(outcome.len(), 1);
        assert!(outcome.results()[0].reachable);
    }

    #[tokio::test]
    async fn test_run_scan_rejects_oversized_block() {
        let coordinator = ScanCoordinator::new(Arc::new(FakeProber::new()));
        let block: NetworkBlock = "10.0.0.0/8".parse().unwrap();
        assert!(run_scan(&block, ssh(), &coordinator).await.is_err());
    }
}
