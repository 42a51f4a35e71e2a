use crate::{ClassifyResponse, HealthResponse, ServiceError, config::SESSION_HEADER};
use reqwest::{
    Method, RequestBuilder, Response,
    multipart::{Form, Part},
};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a running `gesture-server`.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    session_id: Option<String>,
}

impl Client {
    /// `addr` is `host:port` or an `http://` URL; a trailing `/` is ignored.
    pub fn new(addr: impl AsRef<str>) -> Self {
        let addr = addr.as_ref().trim_end_matches('/');
        let base_url = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .pool_max_idle_per_host(2)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url,
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload one JPEG as form field `image`.
    pub async fn classify(&self, jpeg: Vec<u8>) -> Result<ClassifyResponse, ServiceError> {
        let image = Part::bytes(jpeg)
            .file_name("frame.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image", image);
        let response = self
            .send(self.request(Method::POST, "/classify").multipart(form))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let response = self.send(self.request(Method::GET, "/health")).await?;
        Ok(response.json().await?)
    }

    /// Forget the server-side history of this client's session.
    pub async fn reset_session(&self) -> Result<(), ServiceError> {
        self.send(self.request(Method::DELETE, "/session")).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.session_id {
            Some(id) => builder.header(SESSION_HEADER, id.as_str()),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}
