//! Point-to-point message channel between coordinator and workers
//!
//! Framing is length-prefixed: a 4-byte big-endian length, then exactly
//! that many payload bytes. Message boundaries are explicit, so payloads
//! may contain arbitrary bytes, embedded newlines included. Framing lives
//! entirely inside [`codec::Channel`]; call sites deal in typed messages.

pub mod codec;
pub mod messages;

pub use codec::Channel;
pub use messages::{ChunkAssignment, PartialReply};
