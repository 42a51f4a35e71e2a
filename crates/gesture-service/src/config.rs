use clap::Parser;
use gesture::{HISTORY_LENGTH, POINTING_SIGN_ID, PipelineConfig};
use gesture_base::log::LevelFilter;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_SESSION_ID: &str = "default";
pub const DEFAULT_MAX_SESSIONS: usize = 1024;
pub const SESSION_HEADER: &str = "x-session-id";

/// Settings for the classification server.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    bind_addr: String,
    keypoint_model: PathBuf,
    keypoint_labels: PathBuf,
    point_history_model: PathBuf,
    point_history_labels: PathBuf,
    hand_landmark_model: PathBuf,
    min_detection_confidence: f32,
    point_history_score_threshold: f32,
    mirror_input: bool,
    max_body_size: usize,
    session_idle_timeout: Duration,
    max_sessions: usize,
    default_session_id: String,
    pipeline: PipelineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            keypoint_model: "model/keypoint_classifier/keypoint_classifier.onnx".into(),
            keypoint_labels: "model/keypoint_classifier/keypoint_classifier_label.csv".into(),
            point_history_model: "model/point_history_classifier/point_history_classifier.onnx"
                .into(),
            point_history_labels:
                "model/point_history_classifier/point_history_classifier_label.csv".into(),
            hand_landmark_model: "model/hand_landmark.onnx".into(),
            min_detection_confidence: 0.7,
            point_history_score_threshold: 0.5,
            mirror_input: true,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            session_idle_timeout: Duration::from_secs(300),
            max_sessions: DEFAULT_MAX_SESSIONS,
            default_session_id: DEFAULT_SESSION_ID.to_string(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn with_bind_addr(mut self, bind_addr: impl Into<String>) -> Self {
        self.bind_addr = bind_addr.into();
        self
    }

    pub fn with_keypoint_model(mut self, model: impl Into<PathBuf>, labels: impl Into<PathBuf>) -> Self {
        self.keypoint_model = model.into();
        self.keypoint_labels = labels.into();
        self
    }

    pub fn with_point_history_model(
        mut self,
        model: impl Into<PathBuf>,
        labels: impl Into<PathBuf>,
    ) -> Self {
        self.point_history_model = model.into();
        self.point_history_labels = labels.into();
        self
    }

    pub fn with_hand_landmark_model(mut self, model: impl Into<PathBuf>) -> Self {
        self.hand_landmark_model = model.into();
        self
    }

    pub fn with_min_detection_confidence(mut self, confidence: f32) -> Self {
        self.min_detection_confidence = confidence;
        self
    }

    pub fn with_point_history_score_threshold(mut self, threshold: f32) -> Self {
        self.point_history_score_threshold = threshold;
        self
    }

    /// Flip incoming frames left to right before detection.
    pub fn with_mirror_input(mut self, mirror_input: bool) -> Self {
        self.mirror_input = mirror_input;
        self
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.session_idle_timeout = timeout;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    pub fn with_default_session_id(mut self, id: impl Into<String>) -> Self {
        self.default_session_id = id.into();
        self
    }

    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn keypoint_model(&self) -> &PathBuf {
        &self.keypoint_model
    }

    pub fn keypoint_labels(&self) -> &PathBuf {
        &self.keypoint_labels
    }

    pub fn point_history_model(&self) -> &PathBuf {
        &self.point_history_model
    }

    pub fn point_history_labels(&self) -> &PathBuf {
        &self.point_history_labels
    }

    pub fn hand_landmark_model(&self) -> &PathBuf {
        &self.hand_landmark_model
    }

    pub fn min_detection_confidence(&self) -> f32 {
        self.min_detection_confidence
    }

    pub fn point_history_score_threshold(&self) -> f32 {
        self.point_history_score_threshold
    }

    pub fn mirror_input(&self) -> bool {
        self.mirror_input
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    pub fn session_idle_timeout(&self) -> Duration {
        self.session_idle_timeout
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn default_session_id(&self) -> &str {
        &self.default_session_id
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }
}

/// Hand-sign and finger-gesture classification server
#[derive(Parser, Debug)]
#[command(name = "gesture-server", version, about)]
pub struct ServiceArgs {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Directory holding keypoint_classifier/, point_history_classifier/ and hand_landmark.onnx
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,

    /// Minimum hand presence score
    #[arg(long, default_value_t = 0.7)]
    pub min_detection_confidence: f32,

    /// Finger-gesture scores under this are reported as gesture 0
    #[arg(long, default_value_t = 0.5)]
    pub score_threshold: f32,

    /// Number of frames in the point and gesture histories
    #[arg(long, default_value_t = HISTORY_LENGTH, value_parser = parse_positive)]
    pub history_length: usize,

    /// Hand-sign id whose index fingertip is tracked
    #[arg(long, default_value_t = POINTING_SIGN_ID)]
    pub tracked_sign: usize,

    /// Do not mirror incoming frames
    #[arg(long)]
    pub no_mirror: bool,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_SIZE)]
    pub max_body_size: usize,

    /// Seconds before an unused session is dropped
    #[arg(long, default_value_t = 300)]
    pub session_timeout: u64,

    /// Most sessions kept at once; the least recently used is evicted
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS, value_parser = parse_positive)]
    pub max_sessions: usize,

    /// Write logs to <DIR>/<date>.log instead of stdout
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<LevelFilter>,
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl ServiceArgs {
    pub fn to_config(&self) -> ServiceConfig {
        let dir = &self.model_dir;
        ServiceConfig::default()
            .with_bind_addr(self.bind.clone())
            .with_keypoint_model(
                dir.join("keypoint_classifier/keypoint_classifier.onnx"),
                dir.join("keypoint_classifier/keypoint_classifier_label.csv"),
            )
            .with_point_history_model(
                dir.join("point_history_classifier/point_history_classifier.onnx"),
                dir.join("point_history_classifier/point_history_classifier_label.csv"),
            )
            .with_hand_landmark_model(dir.join("hand_landmark.onnx"))
            .with_min_detection_confidence(self.min_detection_confidence)
            .with_point_history_score_threshold(self.score_threshold)
            .with_mirror_input(!self.no_mirror)
            .with_max_body_size(self.max_body_size)
            .with_session_idle_timeout(Duration::from_secs(self.session_timeout))
            .with_max_sessions(self.max_sessions)
            .with_pipeline(
                PipelineConfig::default()
                    .with_history_length(self.history_length)
                    .with_tracked_sign_id(self.tracked_sign),
            )
    }
}
