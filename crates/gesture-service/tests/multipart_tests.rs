use gesture_service::multipart::{self, Part};

#[test]
fn test_boundary_from_content_type() {
    assert_eq!(
        multipart::boundary("multipart/form-data; boundary=----abc123").as_deref(),
        Some("----abc123")
    );
    assert_eq!(
        multipart::boundary("Multipart/Form-Data; boundary=\"quoted\"").as_deref(),
        Some("quoted")
    );
    assert_eq!(multipart::boundary("image/jpeg"), None);
    assert_eq!(multipart::boundary("multipart/form-data"), None);
}

#[test]
fn test_parse_form_with_file() {
    let body = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"user\"\r\n\
\r\n\
alice\r\n\
--XYZ\r\n\
Content-Disposition: form-data; name=\"image\"; filename=\"frame.jpg\"\r\n\
Content-Type: image/jpeg\r\n\
\r\n\
\xff\xd8\r\n--\xff\xd9\r\n\
--XYZ--\r\n";
    let parts = multipart::parse(body, "XYZ").unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].name.as_deref(), Some("user"));
    assert_eq!(parts[0].data, b"alice");
    assert_eq!(parts[1].name.as_deref(), Some("image"));
    assert_eq!(parts[1].filename.as_deref(), Some("frame.jpg"));
    assert_eq!(parts[1].content_type.as_deref(), Some("image/jpeg"));
    // CRLF and dashes inside the payload are not a delimiter
    assert_eq!(parts[1].data, b"\xff\xd8\r\n--\xff\xd9");
}

#[test]
fn test_parse_binary_payload() {
    let mut body = b"--b0und\r\nContent-Disposition: form-data; name=image; filename=\"a.jpg\"\r\n\r\n".to_vec();
    body.extend_from_slice(&[0, 1, 2, 255, 13, 10]);
    body.extend_from_slice(b"\r\n--b0und--\r\n");
    let parts = multipart::parse(&body, "b0und").unwrap();
    assert_eq!(
        parts,
        vec![Part {
            name: Some("image".to_string()),
            filename: Some("a.jpg".to_string()),
            content_type: None,
            data: vec![0, 1, 2, 255, 13, 10],
        }]
    );
}

#[test]
fn test_missing_boundary_is_rejected() {
    assert!(multipart::parse(b"no delimiters here", "XYZ").is_err());
}

#[test]
fn test_unterminated_body_is_rejected() {
    let body = b"--XYZ\r\nContent-Disposition: form-data; name=\"image\"\r\n\r\npartial";
    assert!(multipart::parse(body, "XYZ").is_err());
}
