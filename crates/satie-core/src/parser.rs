// src/parser.rs
use memchr::{memchr, memmem};

pub const MAX_HEADERS: usize = 32;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer does not yet hold a full request head.
    Incomplete,
    InvalidFormat,
    TooLarge,
}

/// A parsed request head, borrowing from the connection buffer. The body is
/// not parsed here: it starts at `body_offset` and its length comes from the
/// `Content-Length` header.
#[derive(Debug)]
pub struct RequestHead<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub headers: [(&'a str, &'a str); MAX_HEADERS],
    pub header_count: u8,
    pub body_offset: usize,
}

impl RequestHead<'_> {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .take(self.header_count as usize)
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    pub fn content_length(&self) -> u64 {
        self.header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// Parse the head of an HTTP/1.1 request: `METHOD TARGET VERSION` plus up to
/// `MAX_HEADERS` header lines, terminated by an empty line. `Incomplete`
/// means read more bytes and try again.
pub fn parse_head(buf: &[u8]) -> Result<RequestHead<'_>, ParseError> {
    let head_end = memmem::find(buf, b"\r\n\r\n").ok_or(ParseError::Incomplete)?;
    let head = &buf[..head_end];

    let line_end = memmem::find(head, b"\r\n").unwrap_or(head.len());
    let request_line = &head[..line_end];

    let sp1 = memchr(b' ', request_line).ok_or(ParseError::InvalidFormat)?;
    let method = as_str(&request_line[..sp1])?;
    let rest = &request_line[sp1 + 1..];
    let sp2 = memchr(b' ', rest).ok_or(ParseError::InvalidFormat)?;
    let target = as_str(&rest[..sp2])?;

    let (path, query) = match target.find('?') {
        Some(idx) => (&target[..idx], &target[idx + 1..]),
        None => (target, ""),
    };

    let mut headers = [("", ""); MAX_HEADERS];
    let mut header_count: u8 = 0;
    let mut cursor = line_end.saturating_add(2).min(head.len());

    while cursor < head.len() {
        if header_count as usize >= MAX_HEADERS {
            return Err(ParseError::TooLarge);
        }
        let line_len = memmem::find(&head[cursor..], b"\r\n").unwrap_or(head.len() - cursor);
        let line = &head[cursor..cursor + line_len];

        let colon = memchr(b':', line).ok_or(ParseError::InvalidFormat)?;
        let name = as_str(&line[..colon])?;
        let value = as_str(&line[colon + 1..])?.trim();
        headers[header_count as usize] = (name, value);
        header_count += 1;
        cursor += line_len + 2;
    }

    Ok(RequestHead {
        method,
        path,
        query,
        headers,
        header_count,
        body_offset: head_end + 4,
    })
}

fn as_str(raw: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(raw).map_err(|_| ParseError::InvalidFormat)
}
