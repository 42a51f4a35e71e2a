use gesture_service::{ServiceError, framing};
use http::{Method, Response, StatusCode, Version, header};

#[tokio::test]
async fn test_read_request_with_body() {
    let raw = b"POST /classify HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nX-Session-Id: cam1\r\n\r\nhello";
    let mut reader: &[u8] = raw;
    let request = framing::read_request(&mut reader, 1024).await.unwrap().unwrap();
    assert_eq!(request.method(), Method::POST);
    assert_eq!(request.uri().path(), "/classify");
    assert_eq!(request.version(), Version::HTTP_11);
    assert_eq!(request.headers()["x-session-id"], "cam1");
    assert_eq!(request.body(), b"hello");
}

#[tokio::test]
async fn test_read_pipelined_requests() {
    let raw = b"GET /health HTTP/1.1\r\n\r\nGET /health HTTP/1.1\r\nConnection: close\r\n\r\n";
    let mut reader: &[u8] = raw;
    let first = framing::read_request(&mut reader, 1024).await.unwrap().unwrap();
    assert!(framing::keep_alive(&first));
    let second = framing::read_request(&mut reader, 1024).await.unwrap().unwrap();
    assert!(!framing::keep_alive(&second));
    assert!(framing::read_request(&mut reader, 1024).await.unwrap().is_none());
}

#[tokio::test]
async fn test_http10_closes_by_default() {
    let mut reader: &[u8] = b"GET /health HTTP/1.0\r\n\r\n";
    let request = framing::read_request(&mut reader, 1024).await.unwrap().unwrap();
    assert_eq!(request.version(), Version::HTTP_10);
    assert!(!framing::keep_alive(&request));
}

#[tokio::test]
async fn test_body_over_limit() {
    let mut reader: &[u8] = b"POST /classify HTTP/1.1\r\nContent-Length: 2048\r\n\r\n";
    let err = framing::read_request(&mut reader, 1024).await.unwrap_err();
    assert!(matches!(err, ServiceError::BodyTooLarge { limit: 1024, got: 2048 }));
    assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_chunked_is_unsupported() {
    let mut reader: &[u8] = b"POST /classify HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n";
    let err = framing::read_request(&mut reader, 1024).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unsupported(_)));
}

#[tokio::test]
async fn test_garbage_is_bad_request() {
    let mut reader: &[u8] = b"\x01\x02 nonsense\r\n\r\n";
    let err = framing::read_request(&mut reader, 1024).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_truncated_body_is_closed_connection() {
    let mut reader: &[u8] = b"POST /classify HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
    let err = framing::read_request(&mut reader, 1024).await.unwrap_err();
    assert!(matches!(err, ServiceError::ConnectionClosed));
}

#[tokio::test]
async fn test_write_response() {
    let mut response = Response::new(br#"{"status":"ok"}"#.to_vec());
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

    let mut wire = Vec::new();
    framing::write_response(&mut wire, &response).await.unwrap();
    let text = String::from_utf8(wire.clone()).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("content-type: application/json\r\n"));
    assert!(text.contains("content-length: 15\r\n"));
    assert!(text.ends_with("\r\n\r\n{\"status\":\"ok\"}"));
}

#[tokio::test]
async fn test_no_content_has_no_length() {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let mut wire = Vec::new();
    framing::write_response(&mut wire, &response).await.unwrap();
    let text = String::from_utf8(wire).unwrap();
    assert_eq!(text, "HTTP/1.1 204 No Content\r\n\r\n");
}

#[tokio::test]
async fn test_head_limit_applies_within_a_line() {
    let mut raw = b"GET /".to_vec();
    raw.extend(std::iter::repeat_n(b'a', framing::MAX_HEAD_SIZE + 4096));
    let mut reader: &[u8] = &raw;
    let err = framing::read_request(&mut reader, 1024).await.unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
    // the rest of the line is left unread
    assert!(!reader.is_empty());
}

#[tokio::test]
async fn test_head_limit_across_lines() {
    let mut raw = b"GET / HTTP/1.1\r\n".to_vec();
    while raw.len() <= framing::MAX_HEAD_SIZE {
        raw.extend_from_slice(b"X-Filler: 0123456789abcdef\r\n");
    }
    raw.extend_from_slice(b"\r\n");
    let mut reader: &[u8] = &raw;
    let err = framing::read_request(&mut reader, 1024).await.unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
}
