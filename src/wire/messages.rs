//! Messages exchanged between coordinator and workers
//!
//! The protocol is one round trip per worker per run: the coordinator
//! sends a [`ChunkAssignment`], the worker answers with a
//! [`PartialReply`], then both sides are done with each other.

use crate::op::{OperationSpec, PartialResult};
use serde::{Deserialize, Serialize};

/// Coordinator -> worker: the operation to run plus the worker's chunk.
///
/// `start_index` is the 0-based global index of `lines[0]`, so the worker
/// can report line numbers relative to the whole dataset. An empty
/// `lines` is a valid assignment and yields the operation's identity
/// partial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkAssignment {
    pub operation: OperationSpec,
    pub start_index: usize,
    pub lines: Vec<String>,
}

/// Worker -> coordinator: the chunk's partial result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialReply {
    pub partial: PartialResult,
}
