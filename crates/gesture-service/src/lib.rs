//! HTTP front end for the gesture pipeline.
//!
//! `POST /classify` takes an image (multipart field `image` or a raw
//! `image/*` body) and answers with the classified hands; sessions are
//! selected with the `X-Session-Id` header.

pub mod client;
pub mod config;
pub mod error;
pub mod framing;
pub mod multipart;
pub mod protocol;
pub mod server;
pub mod service;
pub mod session;

pub use client::Client;
pub use config::{ServiceArgs, ServiceConfig};
pub use error::ServiceError;
pub use protocol::{ClassifyResponse, ErrorResponse, HealthResponse, Prediction};
pub use server::Server;
pub use service::{BoxedDetector, Service};
pub use session::{SessionRegistry, SessionSlot};
