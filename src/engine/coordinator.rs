//! Coordinator role: partition, dispatch, compute, collect, reduce

use super::{EngineConfig, RunReport};
use crate::error::{EngineError, Result};
use crate::op::OperationSpec;
use crate::partition::{partition, ChunkSpec};
use crate::reduce::{reduce, Contribution};
use crate::wire::{Channel, ChunkAssignment, PartialReply};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

/// One spawned worker: its process handle plus the stdio channel the
/// coordinator talks to it over.
struct WorkerHandle {
    rank: usize,
    child: Child,
    channel: Channel<ChildStdout, ChildStdin>,
}

pub struct Coordinator {
    config: EngineConfig,
}

impl Coordinator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run one complete pipeline: partition `lines`, fan chunks out to
    /// worker processes, fold the partials back together, and render.
    pub async fn run(&self, operation: &OperationSpec, lines: &[String]) -> Result<RunReport> {
        self.config.validate()?;
        let started = Instant::now();

        let workers = self.config.workers;
        let chunks = partition(lines.len(), workers);
        info!(
            total_items = lines.len(),
            workers,
            chunk_size = chunks[0].len(),
            "partitioned input"
        );

        // Alone in the group: compute everything locally, skip dispatch.
        if workers == 1 {
            let partial = operation.apply(lines, 0);
            return self.finish(operation, vec![Contribution::Received(partial)], started);
        }

        let mut handles = Vec::with_capacity(workers - 1);
        let dispatched = self
            .dispatch_and_collect(operation, lines, &chunks, &mut handles)
            .await;

        match dispatched {
            Ok(contributions) => {
                reap_workers(&mut handles).await;
                self.finish(operation, contributions, started)
            }
            Err(e) => {
                // Never leave children blocked on an undelivered message.
                shutdown_workers(&mut handles).await;
                Err(e)
            }
        }
    }

    async fn dispatch_and_collect(
        &self,
        operation: &OperationSpec,
        lines: &[String],
        chunks: &[ChunkSpec],
        handles: &mut Vec<WorkerHandle>,
    ) -> Result<Vec<Contribution>> {
        // Spawn ranks 1..W, then dispatch in increasing index order. Empty
        // chunks are still dispatched; the worker answers with the identity.
        for rank in 1..chunks.len() {
            handles.push(self.spawn_worker(rank)?);
        }
        for (handle, chunk) in handles.iter_mut().zip(&chunks[1..]) {
            let assignment = ChunkAssignment {
                operation: operation.clone(),
                start_index: chunk.start,
                lines: lines[chunk.start..chunk.end].to_vec(),
            };
            debug!(
                rank = handle.rank,
                start = chunk.start,
                len = chunk.len(),
                "dispatching chunk"
            );
            handle.channel.send(&assignment).await?;
        }

        // The coordinator is worker 0: compute its own chunk while the
        // others run.
        let own_chunk = chunks[0];
        let own_partial = operation.apply(&lines[own_chunk.start..own_chunk.end], own_chunk.start);

        // Collect in ascending rank order. If a later worker finished
        // first we still stall on the earliest expected rank; the fixed
        // order is what keeps ordered reductions deterministic.
        let mut contributions = vec![Contribution::Received(own_partial)];
        for handle in handles.iter_mut() {
            contributions.push(self.collect_one(handle).await?);
        }
        Ok(contributions)
    }

    async fn collect_one(&self, handle: &mut WorkerHandle) -> Result<Contribution> {
        let rank = handle.rank;
        let reply: Result<PartialReply> = match self.config.worker_timeout {
            Some(deadline) => {
                match tokio::time::timeout(deadline, handle.channel.recv()).await {
                    Ok(received) => received,
                    Err(_) => {
                        warn!(rank, ?deadline, "worker missed collection deadline, killing it");
                        let _ = handle.child.start_kill();
                        return Ok(Contribution::Missing {
                            rank,
                            reason: format!("no reply within {deadline:?}"),
                        });
                    }
                }
            }
            None => handle.channel.recv().await,
        };

        let reply = reply?;
        debug!(rank, "collected partial result");
        Ok(Contribution::Received(reply.partial))
    }

    fn spawn_worker(&self, rank: usize) -> Result<WorkerHandle> {
        let mut child = Command::new(&self.config.worker_program)
            .args(&self.config.worker_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| EngineError::WorkerSpawn { rank, source })?;

        let stdin = child.stdin.take().ok_or_else(|| EngineError::Protocol(
            "spawned worker has no stdin pipe".to_string(),
        ))?;
        let stdout = child.stdout.take().ok_or_else(|| EngineError::Protocol(
            "spawned worker has no stdout pipe".to_string(),
        ))?;

        Ok(WorkerHandle {
            rank,
            child,
            channel: Channel::new(stdout, stdin),
        })
    }

    fn finish(
        &self,
        operation: &OperationSpec,
        contributions: Vec<Contribution>,
        started: Instant,
    ) -> Result<RunReport> {
        let outcome = reduce(operation, contributions)?;
        let output = operation.render(outcome.partial)?;
        let elapsed = started.elapsed();
        info!(?elapsed, missing = outcome.missing_workers.len(), "run complete");
        Ok(RunReport {
            output,
            missing_workers: outcome.missing_workers,
            elapsed,
        })
    }
}

/// Wait for workers that completed their round trip. Killed workers are
/// reaped here too.
async fn reap_workers(handles: &mut [WorkerHandle]) {
    for handle in handles {
        if let Err(e) = handle.child.wait().await {
            warn!(rank = handle.rank, error = %e, "failed to reap worker");
        }
    }
}

/// Kill and reap every spawned worker. Used on coordinator-side failure so
/// no child is left blocked forever on a receive that will never match.
async fn shutdown_workers(handles: &mut [WorkerHandle]) {
    for handle in handles {
        let _ = handle.child.start_kill();
        let _ = handle.child.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::search::SearchOp;
    use crate::op::wordcount::{TokenRule, WordCountOp};
    use std::time::Duration;

    fn single_worker_config() -> EngineConfig {
        EngineConfig {
            workers: 1,
            worker_timeout: None,
            worker_program: "unused".into(),
            worker_args: Vec::new(),
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_single_worker_search_scenario() {
        let coordinator = Coordinator::new(single_worker_config());
        let operation = OperationSpec::Search(SearchOp {
            term: "Alice".to_string(),
        });
        let input = lines(&["Alice, 111", "Bob, 222", "Alice, 333"]);

        let report = coordinator.run(&operation, &input).await.unwrap();
        assert_eq!(report.output, "1 : Alice, 111\n3 : Alice, 333\n");
        assert!(report.missing_workers.is_empty());
    }

    #[tokio::test]
    async fn test_single_worker_top_k_word_count() {
        let coordinator = Coordinator::new(single_worker_config());
        let operation = OperationSpec::WordCount(WordCountOp {
            rule: TokenRule::Alphabetic,
            top_k: Some(1),
        });
        let input = lines(&["Alice", "Bob", "alice"]);

        let report = coordinator.run(&operation, &input).await.unwrap();
        assert_eq!(report.output, "alice 2\n");
    }

    #[tokio::test]
    async fn test_empty_input_produces_empty_output() {
        let coordinator = Coordinator::new(single_worker_config());
        let operation = OperationSpec::Search(SearchOp {
            term: "x".to_string(),
        });

        let report = coordinator.run(&operation, &[]).await.unwrap();
        assert_eq!(report.output, "");
    }

    #[tokio::test]
    async fn test_deadline_expiry_kills_stalled_workers_and_records_missing() {
        // A worker that never speaks the protocol: sleeps, replies to
        // nothing. The run must not hang; the stalled ranks are killed
        // and reported missing, and the coordinator's own chunk still
        // makes it into the output.
        let config = EngineConfig {
            workers: 3,
            worker_timeout: Some(Duration::from_millis(200)),
            worker_program: "/bin/sleep".into(),
            worker_args: vec!["30".to_string()],
        };
        let coordinator = Coordinator::new(config);
        let operation = OperationSpec::Search(SearchOp {
            term: "a".to_string(),
        });
        let input = lines(&["a1", "b", "c"]);

        let started = Instant::now();
        let report = coordinator.run(&operation, &input).await.unwrap();

        assert_eq!(report.missing_workers, vec![1, 2]);
        assert_eq!(report.output, "1 : a1\n");
        // Two sequential 200 ms deadlines, nowhere near the sleep.
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_zero_workers_is_a_config_error() {
        let config = EngineConfig {
            workers: 0,
            worker_timeout: Some(Duration::from_secs(1)),
            worker_program: "unused".into(),
            worker_args: Vec::new(),
        };
        let coordinator = Coordinator::new(config);
        let operation = OperationSpec::Search(SearchOp {
            term: "x".to_string(),
        });

        let err = coordinator.run(&operation, &[]).await.unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
