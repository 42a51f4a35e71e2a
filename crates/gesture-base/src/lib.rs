//! Shared primitives for the gesture workspace: small geometry types, an
//! HWC tensor container and the process-wide logger.

pub mod logging;
pub mod rect;
pub mod tensor;
pub mod vec2;

pub use logging::{FileLogger, StdoutLogger, default_level, init_file_logger, init_stdout_logger};
pub use rect::Rect;
pub use tensor::{Tensor, TensorError};
pub use vec2::Vec2;

// Re-export log crate so downstream crates can use gesture_base::log::*
pub use log;
