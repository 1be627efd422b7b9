use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while bringing up or running the compass window.
#[derive(Debug, Error)]
pub enum CompassError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("frame buffer error: {0}")]
    Pixels(#[from] pixels::Error),
    #[error("cannot read font {path:?}: {source}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0:?} is not a usable TrueType/OpenType font")]
    FontData(PathBuf),
}

/// Reasons an inbound update frame is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame of {0} bytes exceeds the inbound buffer")]
    Oversized(usize),
    #[error("frame is not valid UTF-8")]
    NotUtf8,
    #[error("malformed tuple {0:?}")]
    MalformedTuple(String),
    #[error("heading value {0:?} is not a 16-bit integer")]
    BadValue(String),
}
