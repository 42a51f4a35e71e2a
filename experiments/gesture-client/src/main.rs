use clap::Parser;
use gesture_base::{default_level, init_stdout_logger, log};
use gesture_camera::{Camera, CameraConfig, V4l2Camera};
use gesture_client::{ClientArgs, error_text, prepare_upload, result_text, rgb_to_argb, window_title};
use gesture_service::Client;
use minifb::{Key, Window, WindowOptions};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger(default_level());
    let args = ClientArgs::parse();

    let mut client = Client::new(&args.server);
    if let Some(id) = &args.session {
        client = client.with_session_id(id);
    }
    log::info!("Server: {}", client.base_url());

    let mut camera = V4l2Camera::new(CameraConfig::default().with_device(&args.device))?;
    let first = camera.recv().await?;
    let (height, width, _) = first.image_dims()?;
    log::info!("Camera {} streaming {}x{}", args.device, width, height);

    let mut window = Window::new(&window_title(""), width, height, WindowOptions::default())?;
    window.set_target_fps(30);

    let (result_tx, mut result_rx) = watch::channel(String::new());
    let in_flight = Arc::new(AtomicBool::new(false));
    let interval = args.interval();
    let mut last_upload: Option<Instant> = None;
    let mut frame = first;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if last_upload.is_none_or(|t| t.elapsed() >= interval)
            && !in_flight.swap(true, Ordering::AcqRel)
        {
            last_upload = Some(Instant::now());
            let upload = frame.clone();
            let client = client.clone();
            let tx = result_tx.clone();
            let in_flight = in_flight.clone();
            tokio::spawn(async move {
                let text = match prepare_upload(&upload) {
                    Ok(jpeg) => match client.classify(jpeg).await {
                        Ok(response) => Some(result_text(&response)),
                        Err(e) => {
                            log::warn!("Upload failed: {}", e);
                            Some(error_text(&e))
                        }
                    },
                    Err(e) => {
                        log::warn!("Cannot encode frame: {}", e);
                        None
                    }
                };
                if let Some(text) = text {
                    let _ = tx.send(text);
                }
                in_flight.store(false, Ordering::Release);
            });
        }

        if result_rx.has_changed().unwrap_or(false) {
            let text = result_rx.borrow_and_update().clone();
            log::info!("{}", text);
            window.set_title(&window_title(&text));
        }

        match rgb_to_argb(&frame.data, width, height) {
            Some(argb) => window.update_with_buffer(&argb, width, height)?,
            None => log::warn!("Frame size changed, expected {}x{}", width, height),
        }
        frame = camera.recv().await?;
    }

    log::info!("Exiting");
    Ok(())
}
