use crate::{
    ClassifyResponse, ErrorResponse, HealthResponse, Prediction, ServiceConfig, ServiceError,
    SessionRegistry, config::SESSION_HEADER, multipart,
};
use gesture::{
    ClassificationResult, FrameSize, GestureRecognizer, GestureSession, HandDetector, Labels,
    LabelTable,
};
use gesture_base::log;
use gesture_infer::{HandLandmarkerConfig, Inference};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode, header};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

pub type BoxedDetector = Box<dyn HandDetector + Send>;

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, ServiceError> {
    mutex
        .lock()
        .map_err(|_| ServiceError::Task(format!("{what} lock poisoned")))
}

pub(crate) fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Vec<u8>> {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut response = Response::new(body);
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            log::error!("Failed to serialize response: {}", e);
            empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn empty(status: StatusCode) -> Response<Vec<u8>> {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = status;
    response
}

/// Error reply with an `{"error": ...}` body.
pub(crate) fn error_response(err: &ServiceError) -> Response<Vec<u8>> {
    json(
        err.status(),
        &ErrorResponse {
            error: err.to_string(),
        },
    )
}

/// Request handling: recognizer, detector and per-client sessions.
pub struct Service {
    recognizer: Mutex<GestureRecognizer>,
    detector: Mutex<BoxedDetector>,
    sessions: SessionRegistry,
    config: ServiceConfig,
}

impl Service {
    pub fn new(recognizer: GestureRecognizer, detector: BoxedDetector, config: ServiceConfig) -> Self {
        let sessions = SessionRegistry::new(recognizer.config().history_length())
            .with_max_sessions(config.max_sessions());
        Self {
            recognizer: Mutex::new(recognizer),
            detector: Mutex::new(detector),
            sessions,
            config,
        }
    }

    /// Load models and label tables named by `config` onto the CPU.
    ///
    /// Fails when a label table does not match its classifier.
    pub fn load(config: ServiceConfig) -> Result<Self, ServiceError> {
        let inference = Inference::cpu();
        let history_length = config.pipeline().history_length();

        let keypoint = inference
            .use_keypoint_classifier(config.keypoint_model(), gesture::LANDMARK_COUNT * 2)?;
        let point_history = inference.use_point_history_classifier(
            config.point_history_model(),
            history_length * 2,
            config.point_history_score_threshold(),
        )?;
        let detector = inference.use_hand_landmarker(
            config.hand_landmark_model(),
            HandLandmarkerConfig::default()
                .with_min_detection_confidence(config.min_detection_confidence()),
        )?;

        let keypoint_labels = Labels::load(LabelTable::Keypoint, config.keypoint_labels())?;
        let point_history_labels =
            Labels::load(LabelTable::PointHistory, config.point_history_labels())?;
        log::info!(
            "Loaded {} hand signs and {} finger gestures",
            keypoint_labels.len(),
            point_history_labels.len()
        );

        let recognizer = <GestureRecognizer>::new(
            Box::new(keypoint),
            Box::new(point_history),
            keypoint_labels,
            point_history_labels,
            config.pipeline().clone(),
        )?;
        Ok(Self::new(recognizer, Box::new(detector), config))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    fn session_id(&self, headers: &HeaderMap) -> String {
        headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.config.default_session_id())
            .to_string()
    }

    /// Decode, optionally mirror, detect and classify one image. Blocking.
    pub fn classify_image(
        &self,
        session: &mut GestureSession,
        image: &[u8],
    ) -> Result<Vec<ClassificationResult>, ServiceError> {
        let frame = gesture_image::decode_rgb(image)?;
        let frame = if self.config.mirror_input() {
            gesture_image::flip_horizontal(&frame)?
        } else {
            frame
        };
        let size = FrameSize::of_image(&frame)?;

        let hands = lock(&self.detector, "detector")?.detect(&frame)?;
        let results = lock(&self.recognizer, "recognizer")?.process_frame(session, &hands, size)?;
        Ok(results)
    }

    pub async fn handle(self: Arc<Self>, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let path = request.uri().path().to_string();
        match (path.as_str(), request.method().clone()) {
            ("/classify", Method::POST) => self.classify(request).await,
            ("/session", Method::DELETE) => self.reset_session(request.headers()).await,
            ("/health", Method::GET) => self.health().await,
            ("/classify", _) | ("/session", _) | ("/health", _) => {
                empty(StatusCode::METHOD_NOT_ALLOWED)
            }
            _ => empty(StatusCode::NOT_FOUND),
        }
    }

    async fn classify(self: Arc<Self>, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let id = self.session_id(request.headers());
        let image = match extract_image(request) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Rejected classify request: {}", e);
                return error_response(&e);
            }
        };

        let slot = self.sessions.get_or_create(&id).await;
        let service = self.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let mut slot = lock(&slot, "session")?;
            service.classify_image(slot.session_mut(), &image)
        })
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))
        .and_then(|outcome| outcome);

        match outcome {
            Ok(results) => json(
                StatusCode::OK,
                &ClassifyResponse::Predictions {
                    predictions: results.iter().map(Prediction::from).collect(),
                },
            ),
            Err(e) => {
                if e.status().is_server_error() {
                    log::error!("Classification failed for session '{}': {}", id, e);
                } else {
                    log::debug!("Session '{}': {}", id, e);
                }
                error_response(&e)
            }
        }
    }

    async fn reset_session(&self, headers: &HeaderMap) -> Response<Vec<u8>> {
        let id = self.session_id(headers);
        self.sessions.remove(&id).await;
        empty(StatusCode::NO_CONTENT)
    }

    async fn health(&self) -> Response<Vec<u8>> {
        json(
            StatusCode::OK,
            &HealthResponse {
                status: "ok".to_string(),
                sessions: self.sessions.len().await,
            },
        )
    }
}

/// Image bytes from a multipart `image` field or a raw `image/*` body.
fn extract_image(request: Request<Vec<u8>>) -> Result<Vec<u8>, ServiceError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = request.into_body();

    if let Some(boundary) = multipart::boundary(&content_type) {
        return multipart::parse(&body, &boundary)?
            .into_iter()
            .find(|part| part.name.as_deref() == Some("image"))
            .map(|part| part.data)
            .filter(|data| !data.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("missing form field 'image'".to_string()));
    }
    if content_type.is_empty() || content_type.starts_with("image/") || content_type == "application/octet-stream" {
        if body.is_empty() {
            return Err(ServiceError::BadRequest("empty body".to_string()));
        }
        return Ok(body);
    }
    Err(ServiceError::BadRequest(format!(
        "unsupported content type '{content_type}'"
    )))
}
