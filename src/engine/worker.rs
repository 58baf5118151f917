//! Worker role: one assignment in, one partial result out
//!
//! A worker speaks the wire protocol on its own stdin/stdout, so nothing
//! else in the process may write to stdout; logging goes to stderr.

use crate::error::Result;
use crate::wire::{Channel, ChunkAssignment, PartialReply};
use tracing::debug;

/// Receive one chunk assignment, compute it, send the partial back, done.
/// Exactly one round trip; the process exits when this returns.
pub async fn run() -> Result<()> {
    let mut channel = Channel::new(tokio::io::stdin(), tokio::io::stdout());

    let assignment: ChunkAssignment = channel.recv().await?;
    debug!(
        start_index = assignment.start_index,
        lines = assignment.lines.len(),
        "received chunk assignment"
    );

    let partial = assignment
        .operation
        .apply(&assignment.lines, assignment.start_index);
    channel.send(&PartialReply { partial }).await?;

    debug!("partial result sent, worker done");
    Ok(())
}
