//! Per-chunk operations
//!
//! An [`Operation`] turns a chunk of lines into a partial result and knows
//! how to merge partials and render the final aggregate. The engine is
//! generic over the operation; the concrete ones are substring search
//! ([`search::SearchOp`]) and word-frequency counting
//! ([`wordcount::WordCountOp`]).
//!
//! [`OperationSpec`] is the serializable form shipped to worker processes;
//! it dispatches to the concrete operations and pairs each with its
//! [`PartialResult`] variant.

pub mod search;
pub mod wordcount;

use crate::error::{EngineError, Result};
use crate::op::search::{MatchRecord, SearchOp};
use crate::op::wordcount::WordCountOp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A pure chunk-in, partial-out computation with a merge rule.
///
/// `apply` must be deterministic and side-effect free. `combine` must
/// accept partials in worker-index order; for ordered outputs (search)
/// that order is what makes plain concatenation globally sorted.
pub trait Operation {
    type Partial;

    /// Compute this operation over one chunk. `global_offset` is the
    /// 0-based index of the chunk's first line in the whole dataset.
    fn apply(&self, lines: &[String], global_offset: usize) -> Self::Partial;

    /// The neutral partial, produced for empty chunks.
    fn identity(&self) -> Self::Partial;

    /// Merge the next worker's partial into the running aggregate.
    fn combine(&self, acc: Self::Partial, next: Self::Partial) -> Self::Partial;

    /// Render the fully merged result as the output text.
    fn render(&self, partial: Self::Partial) -> String;
}

/// Serializable selection of an operation, sent to workers as part of
/// their chunk assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationSpec {
    Search(SearchOp),
    WordCount(WordCountOp),
}

/// One worker's contribution, in the wire-friendly form matching
/// [`OperationSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialResult {
    Search(Vec<MatchRecord>),
    WordCount(HashMap<String, u64>),
}

impl OperationSpec {
    pub fn apply(&self, lines: &[String], global_offset: usize) -> PartialResult {
        match self {
            OperationSpec::Search(op) => PartialResult::Search(op.apply(lines, global_offset)),
            OperationSpec::WordCount(op) => {
                PartialResult::WordCount(op.apply(lines, global_offset))
            }
        }
    }

    pub fn identity(&self) -> PartialResult {
        match self {
            OperationSpec::Search(op) => PartialResult::Search(op.identity()),
            OperationSpec::WordCount(op) => PartialResult::WordCount(op.identity()),
        }
    }

    /// Merge two partials. A partial of the wrong variant means a worker
    /// replied for a different operation than it was assigned, which is a
    /// protocol violation.
    pub fn combine(&self, acc: PartialResult, next: PartialResult) -> Result<PartialResult> {
        match (self, acc, next) {
            (OperationSpec::Search(op), PartialResult::Search(a), PartialResult::Search(b)) => {
                Ok(PartialResult::Search(op.combine(a, b)))
            }
            (
                OperationSpec::WordCount(op),
                PartialResult::WordCount(a),
                PartialResult::WordCount(b),
            ) => Ok(PartialResult::WordCount(op.combine(a, b))),
            _ => Err(EngineError::Protocol(
                "partial result does not match the assigned operation".to_string(),
            )),
        }
    }

    pub fn render(&self, partial: PartialResult) -> Result<String> {
        match (self, partial) {
            (OperationSpec::Search(op), PartialResult::Search(p)) => Ok(op.render(p)),
            (OperationSpec::WordCount(op), PartialResult::WordCount(p)) => Ok(op.render(p)),
            _ => Err(EngineError::Protocol(
                "partial result does not match the assigned operation".to_string(),
            )),
        }
    }
}
