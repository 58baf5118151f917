//! Reduce phase: fold per-worker partials into the final result
//!
//! Partials are folded in ascending worker-index order. For search that
//! order is load-bearing: each chunk is a disjoint ordered sub-range
//! dispatched in increasing index order, so in-order concatenation yields
//! output sorted by global line number with no extra sort. For word count
//! the merge is a commutative sum and the order is irrelevant.

use crate::error::Result;
use crate::op::{OperationSpec, PartialResult};
use tracing::warn;

/// One worker's contribution as seen by the reducer. A worker that missed
/// its collection deadline shows up as `Missing` rather than hanging the
/// whole run.
#[derive(Debug)]
pub enum Contribution {
    Received(PartialResult),
    Missing { rank: usize, reason: String },
}

/// The merged partial plus which workers never contributed.
#[derive(Debug)]
pub struct ReduceOutcome {
    pub partial: PartialResult,
    pub missing_workers: Vec<usize>,
}

/// Fold contributions in the order given (ascending worker index),
/// starting from the operation's identity. Missing contributions are
/// skipped and reported, not retried.
pub fn reduce(operation: &OperationSpec, contributions: Vec<Contribution>) -> Result<ReduceOutcome> {
    let mut acc = operation.identity();
    let mut missing_workers = Vec::new();

    for contribution in contributions {
        match contribution {
            Contribution::Received(partial) => {
                acc = operation.combine(acc, partial)?;
            }
            Contribution::Missing { rank, reason } => {
                warn!(rank, %reason, "reducing without worker contribution");
                missing_workers.push(rank);
            }
        }
    }

    Ok(ReduceOutcome {
        partial: acc,
        missing_workers,
    })
}
