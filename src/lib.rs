//! # Chunkfold
//!
//! A static-partition master/worker engine for line-oriented text
//! processing: a coordinator splits the input into contiguous chunks,
//! ships each chunk to a worker process over a length-prefixed stdio
//! channel, folds the partial results back together, and renders one
//! final output.
//!
//! ## Usage
//!
//! ```bash
//! chunkfold search <TERM> <FILES>... [--workers N]
//! chunkfold count <FILES>... [--top K] [--workers N]
//! ```
//!
//! ## Modules
//!
//! - `wire` - Length-prefixed message framing and the typed `Channel`
//! - `partition` - Static chunking of the dataset across workers
//! - `op` - Per-chunk operations: substring search and word count
//! - `reduce` - Folding per-worker partials into the final result
//! - `engine` - The coordinator and worker roles
//! - `input` - File readers feeding the engine its dataset
//! - `error` - Crate-wide error type

pub mod engine;
pub mod error;
pub mod input;
pub mod op;
pub mod partition;
pub mod reduce;
pub mod wire;

pub use error::{EngineError, Result};
