use crate::{Camera, CameraConfig, CameraError};
use gesture_base::{Tensor, log};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Tensor<u8>, CameraError>;

/// MJPEG webcam read on a background thread.
///
/// The device is opened in `new`; streaming starts on the first `recv`.
pub struct V4l2Camera {
    config: CameraConfig,
    device: Option<Device>,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("streaming", &self.receiver.is_some())
            .finish()
    }
}

impl Camera for V4l2Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        self.ensure_started()?;
        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("receiver not initialized".to_string()))?;
        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("capture thread stopped".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // closing the channel stops the capture thread at its next send
        drop(self.receiver.take());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl V4l2Camera {
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())?;

        let format = Format::new(config.width(), config.height(), FourCC::new(b"MJPG"));
        let format = Capture::set_format(&device, &format)?;
        if format.fourcc != FourCC::new(b"MJPG") {
            return Err(CameraError::Device(format!(
                "{} does not support MJPEG",
                config.device()
            )));
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;
        log::info!(
            "Opened {} at {}x{} ({} fps requested)",
            config.device(),
            format.width,
            format.height,
            config.fps()
        );

        Ok(Self {
            config,
            device: Some(device),
            receiver: None,
            thread_handle: None,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }
        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("device already consumed".to_string()))?;

        let buffer_count = self.config.buffer_count();
        let (tx, rx) = mpsc::channel(buffer_count as usize);
        let handle = thread::spawn(move || {
            if let Err(e) = Self::capture_loop(device, &tx, buffer_count) {
                log::error!("Capture thread error: {}", e);
                let _ = tx.blocking_send(Err(e));
            }
        });

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);
        Ok(())
    }

    fn capture_loop(
        device: Device,
        tx: &mpsc::Sender<FrameResult>,
        buffer_count: u32,
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count)
            .map_err(|e| CameraError::Stream(e.to_string()))?;
        loop {
            let (data, _meta) =
                CaptureStream::next(&mut stream).map_err(|e| CameraError::Stream(e.to_string()))?;
            // some webcams emit truncated MJPEG frames while settling
            let frame = match gesture_image::decode_rgb(data) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Dropping undecodable frame: {}", e);
                    continue;
                }
            };
            if tx.blocking_send(Ok(frame)).is_err() {
                return Ok(());
            }
        }
    }
}
