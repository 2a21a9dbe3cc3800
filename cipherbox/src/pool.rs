//! Fixed-size worker pool for independent block operations.
//!
//! A thin wrapper over a dedicated rayon pool. The one guarantee the mode
//! engines rely on is ordered gather: `map_blocks` returns outputs aligned
//! with the input sequence regardless of completion order. Threads are
//! joined when the owning context drops the pool.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

use crate::CipherError;

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Build a pool with `max_workers` threads, defaulting to twice the
    /// available parallelism.
    pub fn new(max_workers: Option<usize>) -> Result<Self, CipherError> {
        let workers = max_workers.unwrap_or_else(default_workers).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("cipherbox-worker-{index}"))
            .build()?;
        debug!(workers, "worker pool ready");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `op` to every block in parallel, preserving input order. The
    /// first failing block aborts the whole map.
    ///
    /// Only immutable-after-setup primitives may be driven through here;
    /// `op` is shared by all workers.
    pub fn map_blocks<B, F>(&self, blocks: Vec<B>, op: F) -> Result<Vec<Vec<u8>>, CipherError>
    where
        B: AsRef<[u8]> + Send + Sync,
        F: Fn(&[u8]) -> Result<Vec<u8>, CipherError> + Send + Sync,
    {
        self.pool
            .install(|| blocks.par_iter().map(|block| op(block.as_ref())).collect())
    }
}

fn default_workers() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);
    2 * cpus
}
