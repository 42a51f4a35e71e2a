//! Parsing of `multipart/form-data` bodies, enough for one uploaded image field.

use crate::ServiceError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Part {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Value of `param` in a header like `form-data; name="image"; filename="a.jpg"`.
fn header_param(value: &str, param: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|item| {
        let (key, val) = item.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case(param)
            .then(|| val.trim().trim_matches('"').to_string())
    })
}

/// Boundary parameter of a `multipart/form-data` content type.
pub fn boundary(content_type: &str) -> Option<String> {
    let mime = content_type.split(';').next()?.trim();
    if !mime.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    header_param(content_type, "boundary").filter(|b| !b.is_empty())
}

fn parse_part(raw: &[u8]) -> Result<Part, ServiceError> {
    let split = find(raw, b"\r\n\r\n")
        .ok_or_else(|| ServiceError::BadRequest("multipart part without headers".to_string()))?;
    let head = std::str::from_utf8(&raw[..split])
        .map_err(|_| ServiceError::BadRequest("multipart headers are not utf-8".to_string()))?;

    let mut part = Part {
        data: raw[split + 4..].to_vec(),
        ..Part::default()
    };
    for line in head.split("\r\n").filter(|l| !l.is_empty()) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if name.trim().eq_ignore_ascii_case("content-disposition") {
            part.name = header_param(value, "name");
            part.filename = header_param(value, "filename");
        } else if name.trim().eq_ignore_ascii_case("content-type") {
            part.content_type = Some(value.to_string());
        }
    }
    Ok(part)
}

/// Split a body into its parts.
pub fn parse(body: &[u8], boundary: &str) -> Result<Vec<Part>, ServiceError> {
    let delimiter = format!("--{boundary}").into_bytes();
    let start = find(body, &delimiter)
        .ok_or_else(|| ServiceError::BadRequest("multipart boundary not found".to_string()))?;
    let mut rest = &body[start + delimiter.len()..];

    let close = [b"\r\n".as_slice(), delimiter.as_slice()].concat();
    let mut parts = Vec::new();
    loop {
        if rest.starts_with(b"--") {
            return Ok(parts);
        }
        rest = rest
            .strip_prefix(b"\r\n")
            .ok_or_else(|| ServiceError::BadRequest("malformed multipart delimiter".to_string()))?;
        let end = find(rest, &close)
            .ok_or_else(|| ServiceError::BadRequest("unterminated multipart body".to_string()))?;
        parts.push(parse_part(&rest[..end])?);
        rest = &rest[end + close.len()..];
    }
}
