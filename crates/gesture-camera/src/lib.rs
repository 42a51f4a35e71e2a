//! Webcam capture for the desktop client and the frame-capture tool.
//!
//! Frames arrive as RGB `Tensor<u8>` in HWC layout through the async
//! [`Camera`] trait.

pub mod config;
pub mod error;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use error::CameraError;
pub use traits::Camera;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
