//! Error types for time parsing, asset provisioning and alarm delivery.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors from parsing an `H:MM` / `HH:MM` alarm time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("Invalid time format. Use HH:MM or H:MM")]
    Format,

    #[error("Invalid hour value")]
    Hour,

    #[error("Invalid minute value")]
    Minute,
}

/// Errors while making sure the sound file is on disk.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to create sound directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download sound from {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to write sound file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from firing the notification or playing the sound.
///
/// These never abort the run; callers log them and carry on.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to run {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    Status { command: String, status: ExitStatus },

    #[error("desktop notification failed")]
    Desktop(#[from] notify_rust::error::Error),

    #[error("failed to open sound file {path}")]
    OpenSound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no audio output available")]
    AudioStream(#[from] rodio::StreamError),

    #[error("failed to decode sound file")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("playback task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// Render an error with its `source()` chain, `outer: inner: root`.
pub fn chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
