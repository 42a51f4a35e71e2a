use clap::Parser;
use frame_capture::{CaptureArgs, FrameSampler, frame_file_name, next_frame_index};
use gesture_base::{Tensor, default_level, init_stdout_logger, log};
use gesture_camera::{Camera, CameraConfig, V4l2Camera};
use minifb::{Key, Window, WindowOptions};
use std::time::{Duration, Instant};

fn to_argb(frame: &Tensor<u8>) -> Vec<u32> {
    frame
        .data
        .chunks_exact(3)
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger(default_level());
    let args = CaptureArgs::parse();

    let dir = args.letter_dir();
    let mut index = next_frame_index(&dir)?;
    log::info!("Saving into {} starting at index {}", dir.display(), index);

    let mut camera = V4l2Camera::new(CameraConfig::default().with_device(&args.device))?;
    let first = camera.recv().await?;
    let (height, width, _) = first.image_dims()?;

    let mut window = if args.no_preview {
        None
    } else {
        let mut window = Window::new(
            &format!("Capturing '{}' - q or ESC to stop", args.letter),
            width,
            height,
            WindowOptions::default(),
        )?;
        window.set_target_fps(30);
        Some(window)
    };

    // let exposure settle
    tokio::time::sleep(Duration::from_secs(1)).await;
    log::info!("Recording for {:?}", args.duration());

    let mut sampler = FrameSampler::new(args.every);
    let mut saved = 0u32;
    let start = Instant::now();
    while start.elapsed() < args.duration() {
        let frame = camera.recv().await?;
        if sampler.tick() {
            let path = dir.join(frame_file_name(&args.person, &args.letter, index));
            gesture_image::save_jpeg(&frame, &path)?;
            log::info!("Saved {}", path.display());
            index += 1;
            saved += 1;
        }

        if let Some(window) = window.as_mut() {
            if !window.is_open() || window.is_key_down(Key::Escape) || window.is_key_down(Key::Q) {
                log::info!("Stopped by user");
                break;
            }
            if frame.shape == [height, width, 3] {
                window.update_with_buffer(&to_argb(&frame), width, height)?;
            }
        }
    }

    log::info!(
        "Saved {} of {} frames in {:.1}s",
        saved,
        sampler.frames_seen(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
