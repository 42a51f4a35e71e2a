use crate::{Service, ServiceError, framing, service::error_response};
use gesture_base::log;
use http::{HeaderValue, header};
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream, ToSocketAddrs},
    task::JoinHandle,
};

/// Accept loop serving `Service` over HTTP/1.1, plus the session janitor.
///
/// Both tasks are aborted when the server is dropped.
pub struct Server {
    _accept_task: JoinHandle<()>,
    _prune_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl Server {
    pub async fn bind(addr: impl ToSocketAddrs, service: Arc<Service>) -> Result<Self, ServiceError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let accept_service = service.clone();
        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        let service = accept_service.clone();
                        tokio::spawn(async move {
                            match serve_connection(stream, peer, service).await {
                                Ok(()) | Err(ServiceError::ConnectionClosed) => {}
                                Err(e) => log::warn!("Connection {} failed: {}", peer, e),
                            }
                        });
                    }
                    Err(e) => {
                        log::warn!("Accept error: {}", e);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
            }
        });

        let timeout = service.config().session_idle_timeout();
        let prune_task = tokio::spawn(async move {
            let period = (timeout / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let pruned = service.sessions().prune_idle(timeout).await;
                if pruned > 0 {
                    log::debug!("Pruned {} idle sessions", pruned);
                }
            }
        });

        Ok(Self {
            _accept_task: accept_task,
            _prune_task: prune_task,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self._accept_task.abort();
        self._prune_task.abort();
    }
}

const LINGER_LIMIT: u64 = 16 * 1024 * 1024;
const LINGER_TIMEOUT: Duration = Duration::from_secs(2);

/// Swallow whatever the peer is still sending so closing the socket does not
/// reset the connection before the error response is read.
async fn linger<R: AsyncRead + Unpin>(reader: &mut R) {
    let mut limited = reader.take(LINGER_LIMIT);
    let mut sink = tokio::io::sink();
    let drain = tokio::io::copy(&mut limited, &mut sink);
    let _ = tokio::time::timeout(LINGER_TIMEOUT, drain).await;
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    service: Arc<Service>,
) -> Result<(), ServiceError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let max_body = service.config().max_body_size();

    loop {
        let request = match framing::read_request(&mut reader, max_body).await {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(()),
            Err(
                e @ (ServiceError::BadRequest(_)
                | ServiceError::BodyTooLarge { .. }
                | ServiceError::Unsupported(_)),
            ) => {
                // the rest of the stream cannot be framed, answer and close
                log::warn!("{} sent an unreadable request: {}", peer, e);
                let mut response = error_response(&e);
                response
                    .headers_mut()
                    .insert(header::CONNECTION, HeaderValue::from_static("close"));
                framing::write_response(&mut write_half, &response).await?;
                write_half.shutdown().await?;
                linger(&mut reader).await;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let keep_alive = framing::keep_alive(&request);
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let start = Instant::now();

        let mut response = service.clone().handle(request).await;
        if !keep_alive {
            response
                .headers_mut()
                .insert(header::CONNECTION, HeaderValue::from_static("close"));
        }
        framing::write_response(&mut write_half, &response).await?;
        log::info!(
            "{} {} {} {} ({:.1} ms)",
            peer,
            method,
            path,
            response.status().as_u16(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        if !keep_alive {
            return Ok(());
        }
    }
}
