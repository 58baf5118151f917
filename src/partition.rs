//! Static partitioning of the input dataset across workers
//!
//! Partitioning is one-shot: chunks are computed once from the total item
//! count and the worker count, dispatched, and never rebalanced.

use serde::{Deserialize, Serialize};

/// A contiguous half-open range `[start, end)` over global item indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpec {
    pub start: usize,
    pub end: usize,
}

impl ChunkSpec {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `total_items` across `worker_count` workers into contiguous,
/// near-equal chunks.
///
/// Chunk size is `ceil(total_items / worker_count)`; worker `i` (the
/// coordinator is worker 0) receives `[i*size, min((i+1)*size, total))`,
/// clamped so trailing workers get empty chunks when `total < workers`.
/// The returned chunks partition `[0, total_items)` exactly: no gaps, no
/// overlaps.
pub fn partition(total_items: usize, worker_count: usize) -> Vec<ChunkSpec> {
    assert!(worker_count >= 1, "worker_count must be at least 1");

    let chunk_size = total_items.div_ceil(worker_count);
    (0..worker_count)
        .map(|i| {
            let start = (i * chunk_size).min(total_items);
            let end = ((i + 1) * chunk_size).min(total_items);
            ChunkSpec { start, end }
        })
        .collect()
}
