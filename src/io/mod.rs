//! Image I/O boundary — decode and encode off the UI thread.
//!
//! A dedicated worker thread owns the codec work; the UI sends commands and
//! drains events over crossbeam channels each frame. The worker never
//! touches pipeline state — it only moves pixels. Decode failures and
//! encode failures come back as events and end up in the status bar.

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::RgbaImage;
use std::path::PathBuf;
use std::thread::JoinHandle;

/// Encodings offered for snapshot export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
        }
    }
}

/// Default filename for an exported snapshot, timestamped so successive
/// exports never collide.
pub fn default_export_name(format: ExportFormat) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("processed_{stamp}.{}", format.extension())
}

/// Commands accepted by the I/O worker.
pub enum IoCommand {
    Decode { path: PathBuf },
    Encode {
        path: PathBuf,
        pixels: RgbaImage,
        format: ExportFormat,
    },
    Shutdown,
}

/// Events emitted by the I/O worker.
pub enum IoEvent {
    Decoded { path: PathBuf, image: RgbaImage },
    DecodeFailed { path: PathBuf, error: String },
    Encoded { path: PathBuf },
    EncodeFailed { path: PathBuf, error: String },
}

/// UI-side handle to the I/O worker thread.
pub struct IoBridge {
    cmd_tx: Sender<IoCommand>,
    event_rx: Receiver<IoEvent>,
}

impl IoBridge {
    /// Spawn the worker and return the bridge plus its join handle.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = unbounded::<IoCommand>();
        let (event_tx, event_rx) = unbounded::<IoEvent>();
        let handle = std::thread::Builder::new()
            .name("imagelab-io".to_string())
            .spawn(move || worker_loop(cmd_rx, event_tx))
            .expect("failed to spawn I/O worker thread");
        (Self { cmd_tx, event_rx }, handle)
    }

    pub fn request_decode(&self, path: PathBuf) {
        let _ = self.cmd_tx.send(IoCommand::Decode { path });
    }

    pub fn request_encode(&self, path: PathBuf, pixels: RgbaImage, format: ExportFormat) {
        let _ = self.cmd_tx.send(IoCommand::Encode {
            path,
            pixels,
            format,
        });
    }

    /// Drain all events produced since the last poll.
    pub fn drain_events(&self) -> Vec<IoEvent> {
        self.event_rx.try_iter().collect()
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(IoCommand::Shutdown);
    }
}

fn worker_loop(cmd_rx: Receiver<IoCommand>, event_tx: Sender<IoEvent>) {
    tracing::info!("I/O worker started");
    while let Ok(command) = cmd_rx.recv() {
        match command {
            IoCommand::Decode { path } => {
                let event = match decode(&path) {
                    Ok(image) => {
                        tracing::info!(path = %path.display(), w = image.width(), h = image.height(), "image decoded");
                        IoEvent::Decoded { path, image }
                    }
                    Err(error) => {
                        tracing::warn!(path = %path.display(), error = %error, "decode failed");
                        IoEvent::DecodeFailed { path, error }
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            IoCommand::Encode {
                path,
                pixels,
                format,
            } => {
                let event = match encode(&path, &pixels, format) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "image encoded");
                        IoEvent::Encoded { path }
                    }
                    Err(error) => {
                        tracing::warn!(path = %path.display(), error = %error, "encode failed");
                        IoEvent::EncodeFailed { path, error }
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            IoCommand::Shutdown => break,
        }
    }
    tracing::info!("I/O worker stopped");
}

fn decode(path: &std::path::Path) -> Result<RgbaImage, String> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| e.to_string())
}

fn encode(path: &std::path::Path, pixels: &RgbaImage, format: ExportFormat) -> Result<(), String> {
    match format {
        ExportFormat::Png => pixels.save_with_format(path, image::ImageFormat::Png),
        // JPEG carries no alpha channel; flatten before encoding.
        ExportFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
            rgb.save_with_format(path, image::ImageFormat::Jpeg)
        }
    }
    .map_err(|e| e.to_string())
}
