use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("failed to spawn worker {rank}")]
    WorkerSpawn {
        rank: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
