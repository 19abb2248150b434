//! Alarm sound playback: external player command or in-process rodio.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use rodio::{Decoder, OutputStreamBuilder, Sink};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::{PlaybackBackend, PlaybackConfig};
use crate::error::{self, DeliveryError};

pub struct Player {
    backend: PlaybackBackend,
    command: String,
    volume: f32,
}

impl Player {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            backend: config.backend,
            command: config.command.clone(),
            volume: config.volume.clamp(0.0, 1.0),
        }
    }

    /// Play the sound file to completion. Failures are logged only.
    pub async fn play(&self, path: &Path) {
        debug!("Playing {}", path.display());

        if let Err(e) = self.try_play(path).await {
            warn!("Error playing sound: {}", error::chain(&e));
        }
    }

    async fn try_play(&self, path: &Path) -> Result<(), DeliveryError> {
        match self.backend {
            PlaybackBackend::Command => self.play_with_command(path).await,
            PlaybackBackend::Rodio => {
                let path = path.to_path_buf();
                let volume = self.volume;
                tokio::task::spawn_blocking(move || play_with_rodio(path, volume)).await?
            }
        }
    }

    async fn play_with_command(&self, path: &Path) -> Result<(), DeliveryError> {
        let status = Command::new(&self.command)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| DeliveryError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DeliveryError::Status {
                command: self.command.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Decode and play on the default output device, blocking until done.
fn play_with_rodio(path: PathBuf, volume: f32) -> Result<(), DeliveryError> {
    let file = File::open(&path).map_err(|source| DeliveryError::OpenSound { path, source })?;
    let source = Decoder::new(BufReader::new(file))?;

    let mut stream = OutputStreamBuilder::open_default_stream()?;
    stream.log_on_drop(false);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
