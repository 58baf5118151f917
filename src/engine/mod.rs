//! Coordinator and worker roles
//!
//! A process plays exactly one role, selected once at startup and never
//! revisited: the coordinator partitions the input, dispatches chunks to
//! spawned worker processes, computes its own chunk (it counts as worker
//! 0), collects one partial per worker, reduces, and renders; a worker
//! receives one assignment over stdio, computes it, replies, and exits.

pub mod coordinator;
pub mod worker;

pub use coordinator::Coordinator;

use crate::error::{EngineError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Static configuration for one run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Total workers including the coordinator. Must be at least 1.
    pub workers: usize,
    /// Per-worker collection deadline. `None` means wait forever, which
    /// matches the historical blocking behavior.
    pub worker_timeout: Option<Duration>,
    /// Program spawned for each worker rank.
    pub worker_program: PathBuf,
    /// Arguments passed to the worker program.
    pub worker_args: Vec<String>,
}

impl EngineConfig {
    /// Configuration that re-invokes the current executable with the
    /// hidden `worker` subcommand.
    pub fn from_current_exe(workers: usize, worker_timeout: Option<Duration>) -> Result<Self> {
        let worker_program = std::env::current_exe()?;
        Ok(Self {
            workers,
            worker_timeout,
            worker_program,
            worker_args: vec!["worker".to_string()],
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(EngineError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Rendered final result, ready for the sink.
    pub output: String,
    /// Ranks whose contributions were dropped at the collection deadline.
    pub missing_workers: Vec<usize>,
    /// Wall time from partitioning through rendering.
    pub elapsed: Duration,
}
