// src/multipart.rs
use memchr::memmem;

/// One part of a multipart/form-data body. `filename` is present only for
/// file-bearing fields.
#[derive(Debug)]
pub struct Part<'a> {
    pub name: Option<&'a str>,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub body: &'a [u8],
}

/// Boundary-delimited iterator over the parts of a multipart body.
///
/// Deliberately lenient: a truncated or malformed tail simply ends the
/// iteration, so callers see a partial field set instead of a failure.
pub struct Multipart<'a> {
    body: &'a [u8],
    marker: Vec<u8>,
}

impl<'a> Multipart<'a> {
    pub fn new(body: &'a [u8], boundary: &str) -> Self {
        let mut marker = Vec::with_capacity(boundary.len() + 2);
        marker.extend_from_slice(b"--");
        marker.extend_from_slice(boundary.as_bytes());
        Self { body, marker }
    }

    /// Build an iterator from a full content-type value, extracting the
    /// `boundary=` parameter. Returns `None` when it is missing.
    pub fn from_content_type(body: &'a [u8], ctype: &str) -> Option<Self> {
        let idx = ctype.find("boundary=")?;
        let mut boundary = &ctype[idx + "boundary=".len()..];
        if let Some(end) = boundary.find(';') {
            boundary = &boundary[..end];
        }
        let boundary = boundary.trim().trim_matches('"');
        if boundary.is_empty() {
            return None;
        }
        Some(Self::new(body, boundary))
    }
}

impl<'a> Iterator for Multipart<'a> {
    type Item = Part<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.body.is_empty() {
            return None;
        }

        let mut start = memmem::find(self.body, &self.marker)?;
        start += self.marker.len();

        // "--" after the marker terminates the body
        if self.body[start..].starts_with(b"--") {
            self.body = &[];
            return None;
        }
        if self.body[start..].starts_with(b"\r\n") {
            start += 2;
        }

        let header_end = memmem::find(&self.body[start..], b"\r\n\r\n")?;
        let header_slice = &self.body[start..start + header_end];
        let body_start = start + header_end + 4;

        // the part runs up to the next marker; a missing one means the body
        // was truncated
        let body_end = body_start + memmem::find(&self.body[body_start..], &self.marker)?;
        // trim only a CRLF that belongs to the payload; on an empty payload
        // the bytes before the marker are the header terminator
        let trimmed_end = if body_end >= body_start + 2 && self.body[..body_end].ends_with(b"\r\n")
        {
            body_end - 2
        } else {
            body_end
        };
        let payload = &self.body[body_start..trimmed_end];

        let (name, filename, content_type) = parse_part_headers(header_slice);
        self.body = &self.body[body_end..];

        Some(Part {
            name,
            filename,
            content_type,
            body: payload,
        })
    }
}

fn parse_part_headers(raw: &[u8]) -> (Option<&str>, Option<&str>, Option<&str>) {
    let mut name = None;
    let mut filename = None;
    let mut content_type = None;

    let Ok(headers) = std::str::from_utf8(raw) else {
        return (None, None, None);
    };
    for line in headers.split("\r\n") {
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("content-disposition:") {
            name = quoted_param(line, &lower, "name=\"");
            filename = quoted_param(line, &lower, "filename=\"");
        } else if lower.starts_with("content-type:") {
            content_type = Some(line["content-type:".len()..].trim());
        }
    }
    (name, filename, content_type)
}

// `lower` is the lowercased copy of `line`; search there, slice the original
// so parameter values keep their case. The token-boundary check keeps
// `name=` from matching inside `filename=`.
fn quoted_param<'a>(line: &'a str, lower: &str, key: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(rel) = lower[from..].find(key) {
        let idx = from + rel;
        if idx == 0 || !lower.as_bytes()[idx - 1].is_ascii_alphanumeric() {
            let rest = &line[idx + key.len()..];
            let end = rest.find('"')?;
            return Some(&rest[..end]);
        }
        from = idx + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "XBOUNDARYX";

    fn sample_body() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(b"--XBOUNDARYX\r\n");
        b.extend_from_slice(b"Content-Disposition: form-data; name=\"title\"\r\n\r\n");
        b.extend_from_slice(b"three etudes\r\n");
        b.extend_from_slice(b"--XBOUNDARYX\r\n");
        b.extend_from_slice(
            b"Content-Disposition: form-data; name=\"score\"; filename=\"score.pdf\"\r\n",
        );
        b.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        b.extend_from_slice(b"%PDF-1.4 fake");
        b.extend_from_slice(b"\r\n--XBOUNDARYX--\r\n");
        b
    }

    #[test]
    fn iterates_text_and_file_parts() {
        let body = sample_body();
        let parts: Vec<Part> = Multipart::new(&body, BOUNDARY).collect();
        assert_eq!(parts.len(), 2);

        assert_eq!(parts[0].name, Some("title"));
        assert_eq!(parts[0].filename, None);
        assert_eq!(parts[0].body, b"three etudes");

        assert_eq!(parts[1].name, Some("score"));
        assert_eq!(parts[1].filename, Some("score.pdf"));
        assert_eq!(parts[1].content_type, Some("application/pdf"));
        assert_eq!(parts[1].body, b"%PDF-1.4 fake");
    }

    #[test]
    fn boundary_from_content_type() {
        let body = sample_body();
        let ctype = format!("multipart/form-data; boundary={}", BOUNDARY);
        let parts: Vec<Part> = Multipart::from_content_type(&body, &ctype)
            .expect("boundary param present")
            .collect();
        assert_eq!(parts.len(), 2);

        assert!(Multipart::from_content_type(&body, "multipart/form-data").is_none());
    }

    #[test]
    fn filename_only_disposition_has_no_name() {
        let mut body = Vec::new();
        body.extend_from_slice(b"--XBOUNDARYX\r\n");
        body.extend_from_slice(b"Content-Disposition: form-data; filename=\"solo.txt\"\r\n\r\n");
        body.extend_from_slice(b"x\r\n--XBOUNDARYX--\r\n");

        let parts: Vec<Part> = Multipart::new(&body, BOUNDARY).collect();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, None);
        assert_eq!(parts[0].filename, Some("solo.txt"));
    }

    #[test]
    fn closing_marker_right_after_headers_yields_empty_payload() {
        // no CRLF between the header terminator and the closing marker
        let body = b"--B\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n--B--\r\n";
        let parts: Vec<Part> = Multipart::new(body, "B").collect();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, Some("a"));
        assert_eq!(parts[0].body, b"");
    }

    #[test]
    fn truncated_body_ends_iteration() {
        let mut body = sample_body();
        body.truncate(body.len() / 2);
        let parts: Vec<Part> = Multipart::new(&body, BOUNDARY).collect();
        // first part is intact, the truncated second one is dropped
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, Some("title"));
    }
}
