// src/response.rs
use crate::cookie::Cookie;
use crate::http::status_line;

/// An HTTP response under assembly: status, ordered headers, accumulated
/// body chunks, and a lazily created cookie jar.
///
/// `Content-Type` is always the first header, fixed at construction.
/// `Content-Length` and `Set-Cookie` are computed by `finalize`, which
/// consumes the response — writing after finalization (or finalizing twice)
/// does not compile.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: Vec<(&'static str, String)>,
    chunks: Vec<Vec<u8>>,
    cookies: Option<Vec<(String, Cookie)>>,
}

impl Response {
    pub fn new(status: u16, content_type: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_string())],
            chunks: Vec::new(),
            cookies: None,
        }
    }

    /// 200 response carrying `body`, typed `text/html`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        let mut resp = Self::new(200, "text/html");
        resp.write(body);
        resp
    }

    /// Plain-text response with an arbitrary status.
    pub fn text(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let mut resp = Self::new(status, "text/plain");
        resp.write(body);
        resp
    }

    pub fn not_found() -> Self {
        Self::text(404, "Not Found")
    }

    /// 302 redirect to `url`.
    pub fn redirect_to(url: &str) -> Self {
        let mut resp = Self::new(302, "text/html");
        resp.redirect(url);
        resp
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Append a body chunk.
    pub fn write(&mut self, chunk: impl Into<Vec<u8>>) {
        self.chunks.push(chunk.into());
    }

    /// Append a `Location` header. The status should be a 3xx code, set at
    /// construction.
    pub fn redirect(&mut self, url: &str) {
        self.headers.push(("Location", url.to_string()));
    }

    pub fn add_header(&mut self, name: &'static str, value: impl Into<String>) {
        self.headers.push((name, value.into()));
    }

    /// Insert or replace the jar entry for `name`, creating the jar on first
    /// use. Replacement keeps the entry's position, so re-setting a cookie
    /// still yields a single `Set-Cookie` header.
    pub fn set_cookie(&mut self, name: impl Into<String>, cookie: Cookie) {
        let name = name.into();
        let jar = self.cookies.get_or_insert_with(Vec::new);
        match jar.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = cookie,
            None => jar.push((name, cookie)),
        }
    }

    /// Expire `name` on the client: the jar entry (created empty if absent)
    /// gets `Max-Age=0`, its other attributes untouched.
    pub fn delete_cookie(&mut self, name: &str) {
        let jar = self.cookies.get_or_insert_with(Vec::new);
        match jar.iter_mut().find(|(n, _)| n == name) {
            Some((_, cookie)) => cookie.max_age = Some(0),
            // a delete-created entry carries only the expiry, no path
            None => jar.push((name.to_string(), Cookie::new("").path("").max_age(0))),
        }
    }

    /// Seal the response for the wire: append `Content-Length` (summed over
    /// the chunks), then one `Set-Cookie` per jar entry in insertion order,
    /// and hand back the status line, headers, and body chunks.
    pub fn finalize(self) -> (&'static str, Vec<(&'static str, String)>, Vec<Vec<u8>>) {
        let Response {
            status,
            mut headers,
            chunks,
            cookies,
        } = self;

        let length: usize = chunks.iter().map(|c| c.len()).sum();
        headers.push(("Content-Length", length.to_string()));
        if let Some(jar) = cookies {
            for (name, cookie) in &jar {
                headers.push(("Set-Cookie", cookie.render(name)));
            }
        }
        (status_line(status), headers, chunks)
    }
}

impl From<String> for Response {
    fn from(body: String) -> Self {
        Response::ok(body)
    }
}

impl From<&str> for Response {
    fn from(body: &str) -> Self {
        Response::ok(body.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Response {
    fn from(body: Vec<u8>) -> Self {
        Response::ok(body)
    }
}
