use crate::CameraError;
use gesture_base::Tensor;

/// Async source of RGB frames, `[height, width, 3]`.
#[allow(async_fn_in_trait)]
pub trait Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError>;
}
