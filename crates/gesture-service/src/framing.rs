//! Server side HTTP/1.1 framing over tokio streams. Request bodies are
//! delimited by `Content-Length` only.

use crate::ServiceError;
use http::{HeaderMap, Request, Response, StatusCode, Version, header};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const MAX_HEAD_SIZE: usize = 64 * 1024;
const MAX_HEADERS: usize = 64;

/// Read bytes up to and including the blank line ending a message head.
///
/// Returns `None` on EOF before the first byte.
async fn read_head<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>, ServiceError> {
    let mut head = Vec::new();
    loop {
        // a line is cut off one byte past the limit
        let remaining = (MAX_HEAD_SIZE + 1 - head.len()) as u64;
        let n = (&mut *reader).take(remaining).read_until(b'\n', &mut head).await?;
        if n == 0 {
            return if head.is_empty() {
                Ok(None)
            } else {
                Err(ServiceError::ConnectionClosed)
            };
        }
        // stray CRLF between pipelined messages
        if head == b"\r\n" {
            head.clear();
            continue;
        }
        if head.ends_with(b"\r\n\r\n") {
            return Ok(Some(head));
        }
        if head.len() > MAX_HEAD_SIZE {
            return Err(ServiceError::BadRequest("message head too large".to_string()));
        }
    }
}

fn content_length(headers: &HeaderMap, limit: usize) -> Result<Option<usize>, ServiceError> {
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return Err(ServiceError::Unsupported("transfer-encoding".to_string()));
    }
    let Some(value) = headers.get(header::CONTENT_LENGTH) else {
        return Ok(None);
    };
    let len = value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or_else(|| ServiceError::BadRequest("invalid content-length".to_string()))?;
    if len > limit {
        return Err(ServiceError::BodyTooLarge { limit, got: len });
    }
    Ok(Some(len))
}

async fn read_body<R: AsyncRead + Unpin>(reader: &mut R, len: usize) -> Result<Vec<u8>, ServiceError> {
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(body)
}

fn version(minor: Option<u8>) -> Version {
    match minor {
        Some(0) => Version::HTTP_10,
        _ => Version::HTTP_11,
    }
}

/// Read one request. `Ok(None)` means the peer closed the connection
/// cleanly between requests.
pub async fn read_request<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_body: usize,
) -> Result<Option<Request<Vec<u8>>>, ServiceError> {
    let Some(head) = read_head(reader).await? else {
        return Ok(None);
    };

    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut parsed = httparse::Request::new(&mut headers);
    match parsed.parse(&head) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => {
            return Err(ServiceError::BadRequest("incomplete request head".to_string()));
        }
        Err(e) => return Err(ServiceError::BadRequest(format!("malformed request: {e}"))),
    }

    let mut builder = Request::builder()
        .method(parsed.method.unwrap_or_default())
        .uri(parsed.path.unwrap_or_default())
        .version(version(parsed.version));
    for h in parsed.headers.iter() {
        builder = builder.header(h.name, h.value);
    }
    let mut request = builder
        .body(Vec::new())
        .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

    let len = content_length(request.headers(), max_body)?.unwrap_or(0);
    *request.body_mut() = read_body(reader, len).await?;
    Ok(Some(request))
}

fn push_headers(head: &mut Vec<u8>, headers: &HeaderMap, body_len: Option<usize>) {
    for (name, value) in headers {
        if name == header::CONTENT_LENGTH {
            continue;
        }
        head.extend_from_slice(name.as_str().as_bytes());
        head.extend_from_slice(b": ");
        head.extend_from_slice(value.as_bytes());
        head.extend_from_slice(b"\r\n");
    }
    if let Some(len) = body_len {
        head.extend_from_slice(format!("content-length: {len}\r\n").as_bytes());
    }
    head.extend_from_slice(b"\r\n");
}

pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response<Vec<u8>>,
) -> Result<(), ServiceError> {
    let status = response.status();
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
    .into_bytes();
    let body_len = (status != StatusCode::NO_CONTENT && !status.is_informational())
        .then_some(response.body().len());
    push_headers(&mut head, response.headers(), body_len);

    writer.write_all(&head).await?;
    writer.write_all(response.body()).await?;
    writer.flush().await?;
    Ok(())
}

/// Whether the connection stays open after answering `request`.
pub fn keep_alive<B>(request: &Request<B>) -> bool {
    let connection = request
        .headers()
        .get(header::CONNECTION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase());
    match request.version() {
        Version::HTTP_10 => connection.is_some_and(|c| c.contains("keep-alive")),
        _ => !connection.is_some_and(|c| c.contains("close")),
    }
}
