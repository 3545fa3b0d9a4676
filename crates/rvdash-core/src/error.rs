use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RvdashError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} was spawned without a {stream} pipe")]
    MissingPipe {
        program: String,
        stream: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}
