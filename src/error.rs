// error.rs: error types; none of these are fatal to the running player

use std::path::PathBuf;
use thiserror::Error;

/// Problems reported by a media element while loading or decoding.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MediaError {
    #[error("no decoder for `.{extension}` sources")]
    Unsupported { extension: String },
    #[error("unable to read media: {0}")]
    Io(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("media contains no frames")]
    Empty,
}

/// Why `play()` did not start playback.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayError {
    #[error("no media source is loaded")]
    NoSource,
    #[error("the media source is not supported")]
    NotSupported,
    #[error("playback was aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("not a video file: {}", path.display())]
    NotVideo { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
