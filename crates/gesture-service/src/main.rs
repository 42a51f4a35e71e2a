use clap::Parser;
use gesture_base::{default_level, init_file_logger, init_stdout_logger, log, log_fatal};
use gesture_service::{Server, Service, ServiceArgs, ServiceConfig, ServiceError};
use std::sync::Arc;

async fn run(config: ServiceConfig) -> Result<(), ServiceError> {
    log::info!(
        "Models: {}, {}, {}",
        config.keypoint_model().display(),
        config.point_history_model().display(),
        config.hand_landmark_model().display()
    );
    log::info!(
        "Mirror input: {}, history length: {}, session timeout: {:?}",
        config.mirror_input(),
        config.pipeline().history_length(),
        config.session_idle_timeout()
    );

    let bind_addr = config.bind_addr().to_string();
    let service = Arc::new(Service::load(config)?);
    let server = Server::bind(bind_addr, service).await?;
    log::info!("Listening on http://{}", server.local_addr());

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = ServiceArgs::parse();
    let level = args.log_level.unwrap_or_else(default_level);
    match &args.log_dir {
        Some(dir) => {
            if let Err(e) = init_file_logger(dir, level) {
                init_stdout_logger(level);
                log::warn!("Cannot log to {}: {}", dir.display(), e);
            }
        }
        None => init_stdout_logger(level),
    }

    if let Err(e) = run(args.to_config()).await {
        log_fatal!("gesture-server: {}", e);
    }
}
