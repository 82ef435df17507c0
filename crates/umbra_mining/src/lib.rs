//! # UMBRA Mining
//!
//! Parallel, independent exploration workers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  requests   ┌──────────────┐
//! │ Orchestrator │────────────>│ shared queue │──┬──> worker 0 (scanner + caches)
//! │  (caller)    │<────────────│  responses   │  ├──> worker 1 (scanner + caches)
//! └──────────────┘             └──────────────┘  └──> worker n (scanner + caches)
//! ```
//!
//! Workers share nothing: each owns one [`ChunkScanner`] with its own
//! gradient caches, trading duplicated cache memory for the complete
//! absence of cross-worker synchronization. Scanning is pure CPU work, so
//! throughput scales near-linearly with worker count.
//!
//! Responses complete in any order; callers correlate on `job_id`. There is
//! no mid-scan cancellation: footprints are small by convention, so
//! dropping the pool (or ignoring a stale `job_id`) is adequate.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, info};
use umbra_core::{ChunkScanRequest, ChunkScanResponse};
use umbra_procedural::ChunkScanner;

/// Errors from miner pool dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinerError {
    /// The pool's workers have shut down; no more requests can be scanned.
    #[error("miner pool has shut down")]
    PoolShutDown,
}

/// A pool of scan workers fed over channels.
///
/// Dropping the pool closes the request queue and joins the workers after
/// they finish their in-flight scans.
pub struct MinerPool {
    request_tx: Option<Sender<ChunkScanRequest>>,
    response_rx: Receiver<ChunkScanResponse>,
    workers: Vec<JoinHandle<()>>,
}

impl MinerPool {
    /// Spawns `worker_count` scan workers.
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` is zero.
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        assert!(worker_count > 0, "miner pool needs at least one worker");
        let (request_tx, request_rx) = unbounded::<ChunkScanRequest>();
        let (response_tx, response_rx) = unbounded::<ChunkScanResponse>();

        let workers = (0..worker_count)
            .map(|worker| {
                let requests = request_rx.clone();
                let responses = response_tx.clone();
                std::thread::Builder::new()
                    .name(format!("umbra-miner-{worker}"))
                    .spawn(move || worker_loop(worker, &requests, &responses))
                    .expect("spawn miner worker thread")
            })
            .collect();

        info!(worker_count, "miner pool started");
        Self {
            request_tx: Some(request_tx),
            response_rx,
            workers,
        }
    }

    /// Queues one scan request for the next idle worker.
    ///
    /// # Errors
    ///
    /// Returns [`MinerError::PoolShutDown`] if every worker has exited.
    pub fn submit(&self, request: ChunkScanRequest) -> Result<(), MinerError> {
        self.request_tx
            .as_ref()
            .ok_or(MinerError::PoolShutDown)?
            .send(request)
            .map_err(|_| MinerError::PoolShutDown)
    }

    /// The response channel. Responses carry the request's `job_id` and may
    /// arrive in any order.
    #[must_use]
    pub fn responses(&self) -> &Receiver<ChunkScanResponse> {
        &self.response_rx
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for MinerPool {
    fn drop(&mut self) {
        // Closing the request channel lets workers drain and exit.
        self.request_tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// One worker: a long-lived scanner whose gradient caches warm up across
/// chunks, pulling from the shared queue until it closes.
fn worker_loop(
    worker: usize,
    requests: &Receiver<ChunkScanRequest>,
    responses: &Sender<ChunkScanResponse>,
) {
    let mut scanner = ChunkScanner::new();
    while let Ok(request) = requests.recv() {
        let job_id = request.job_id;
        debug!(worker, job_id, "scan started");
        let chunk = scanner.scan(&request);
        if responses.send(ChunkScanResponse { chunk, job_id }).is_err() {
            // Caller stopped listening; coarse cancellation.
            break;
        }
    }
    debug!(worker, "miner worker exiting");
}
