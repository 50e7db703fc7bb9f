use crate::stage::phase::Phase;
use std::path::Path;

pub type ReelResult<T> = Result<T, ReelError>;

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("operation '{operation}' failed in phase '{phase}'")]
    Operation {
        phase: Phase,
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("i/o error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache error at event {position}")]
    CacheEvent {
        position: usize,
        #[source]
        source: Box<ReelError>,
    },

    #[error("cache error: no event at {position}, the cache holds {len}")]
    MissingEvent { position: usize, len: usize },

    #[error(
        "frame buffer error: image is {width}x{height}, output is {expected_width}x{expected_height}"
    )]
    FrameSize {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error("encoder error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// I/O failure on `path`, with `what` describing the attempted action.
    pub fn io_at(what: &str, path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("{what} '{}'", path.display()), source)
    }

    pub fn operation(phase: Phase, operation: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Operation {
            phase,
            operation: operation.into(),
            source,
        }
    }

    pub fn at_event(position: usize, source: ReelError) -> Self {
        Self::CacheEvent {
            position,
            source: Box::new(source),
        }
    }

    /// Phase in which an operation failed, if this is an operation failure.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Operation { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
