// src/request.rs
use crate::body::{parse_body, ParsedBody, UploadedFile};
use crate::cookie::parse_cookie_header;
use crate::http::Method;
use crate::multimap::MultiMap;
use crate::router::PathParams;
use std::cell::{OnceCell, RefCell};
use std::io::Read;

/// The normalized environment a gateway hands over, one per request. The
/// body handle is one-shot: it is read at most once, and only by the body
/// parser.
pub struct RequestEnv {
    pub method: String,
    pub script_prefix: String,
    pub path_info: String,
    pub query_string: String,
    pub content_type: String,
    pub content_length: u64,
    pub cookie_header: Option<String>,
    pub body: Box<dyn Read>,
}

impl Default for RequestEnv {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            script_prefix: String::new(),
            path_info: "/".to_string(),
            query_string: String::new(),
            content_type: String::new(),
            content_length: 0,
            cookie_header: None,
            body: Box::new(std::io::empty()),
        }
    }
}

/// Lazy facade over one `RequestEnv`.
///
/// Every derived field is computed on first access and cached for the rest
/// of the request; the body is parsed at most once, which is what makes the
/// one-shot body handle safe. Cell types keep the request confined to the
/// thread serving it.
pub struct Request {
    raw_method: String,
    script_prefix: String,
    path_info: String,
    query_string: String,
    content_type: String,
    content_length: u64,
    cookie_header: Option<String>,
    reader: RefCell<Box<dyn Read>>,
    method: OnceCell<Method>,
    path: OnceCell<String>,
    query_args: OnceCell<MultiMap<String>>,
    cookies: OnceCell<MultiMap<String>>,
    body: OnceCell<ParsedBody>,
}

impl Request {
    pub fn new(env: RequestEnv) -> Self {
        Self {
            raw_method: env.method,
            script_prefix: env.script_prefix,
            path_info: env.path_info,
            query_string: env.query_string,
            content_type: env.content_type,
            content_length: env.content_length,
            cookie_header: env.cookie_header,
            reader: RefCell::new(env.body),
            method: OnceCell::new(),
            path: OnceCell::new(),
            query_args: OnceCell::new(),
            cookies: OnceCell::new(),
            body: OnceCell::new(),
        }
    }

    pub fn method(&self) -> Method {
        *self
            .method
            .get_or_init(|| Method::parse(&self.raw_method))
    }

    /// Script prefix and path info joined, with a guaranteed trailing `/`.
    pub fn path(&self) -> &str {
        self.path.get_or_init(|| {
            let mut path = format!("{}{}", self.script_prefix, self.path_info);
            if !path.ends_with('/') {
                path.push('/');
            }
            path
        })
    }

    pub fn query_args(&self) -> &MultiMap<String> {
        self.query_args
            .get_or_init(|| crate::body::parse_urlencoded(self.query_string.as_bytes()))
    }

    /// Cookies from the inbound header; a missing or unparseable header
    /// yields an empty map.
    pub fn cookies(&self) -> &MultiMap<String> {
        self.cookies.get_or_init(|| {
            self.cookie_header
                .as_deref()
                .map(parse_cookie_header)
                .unwrap_or_default()
        })
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies().get(name).map(String::as_str)
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Form fields from an url-encoded or multipart body; `None` when the
    /// content type is neither.
    pub fn form(&self) -> Option<&MultiMap<String>> {
        self.parsed_body().0.as_ref()
    }

    /// Uploaded files from a multipart body; `None` for other content types.
    pub fn files(&self) -> Option<&MultiMap<UploadedFile>> {
        self.parsed_body().1.as_ref()
    }

    fn parsed_body(&self) -> &ParsedBody {
        self.body.get_or_init(|| {
            let mut reader = self.reader.borrow_mut();
            parse_body(&self.content_type, self.content_length, reader.as_mut())
        })
    }
}

/// What a route handler receives: the request plus the path captures the
/// route's pattern extracted.
pub struct Context {
    pub req: Request,
    pub params: PathParams,
}

impl Context {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingReader {
        inner: Cursor<Vec<u8>>,
        reads: Arc<AtomicUsize>,
    }

    impl Read for CountingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(buf)
        }
    }

    fn counted_env(ctype: &str, body: &[u8]) -> (RequestEnv, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let env = RequestEnv {
            method: "POST".to_string(),
            content_type: ctype.to_string(),
            content_length: body.len() as u64,
            body: Box::new(CountingReader {
                inner: Cursor::new(body.to_vec()),
                reads: Arc::clone(&reads),
            }),
            ..RequestEnv::default()
        };
        (env, reads)
    }

    #[test]
    fn path_joins_prefix_and_adds_trailing_slash() {
        let req = Request::new(RequestEnv {
            script_prefix: "/app".to_string(),
            path_info: "/hello".to_string(),
            ..RequestEnv::default()
        });
        assert_eq!(req.path(), "/app/hello/");

        let req = Request::new(RequestEnv {
            path_info: "/already/".to_string(),
            ..RequestEnv::default()
        });
        assert_eq!(req.path(), "/already/");
    }

    #[test]
    fn method_parses_case_insensitively() {
        let req = Request::new(RequestEnv {
            method: "post".to_string(),
            ..RequestEnv::default()
        });
        assert_eq!(req.method(), Method::Post);
    }

    #[test]
    fn query_args_keep_blanks_and_order() {
        let req = Request::new(RequestEnv {
            query_string: "t=satie&p=&t=erik".to_string(),
            ..RequestEnv::default()
        });
        assert_eq!(req.query_args().get("t").map(String::as_str), Some("erik"));
        assert_eq!(req.query_args().get("p").map(String::as_str), Some(""));
        assert_eq!(req.query_args().get_all("t").len(), 2);
    }

    #[test]
    fn missing_cookie_header_degrades_to_empty() {
        let req = Request::new(RequestEnv::default());
        assert!(req.cookies().is_empty());
        assert_eq!(req.cookie("session"), None);
    }

    #[test]
    fn cookie_lookup() {
        let req = Request::new(RequestEnv {
            cookie_header: Some("session=s1; theme=dark".to_string()),
            ..RequestEnv::default()
        });
        assert_eq!(req.cookie("theme"), Some("dark"));
    }

    #[test]
    fn body_is_parsed_once_and_memoized() {
        let (env, reads) = counted_env("application/x-www-form-urlencoded", b"a=1");
        let req = Request::new(env);

        assert_eq!(req.form().unwrap().get("a").map(String::as_str), Some("1"));
        let after_first = reads.load(Ordering::SeqCst);
        assert!(after_first > 0);

        // second access must not touch the one-shot reader again
        assert!(req.form().is_some());
        assert!(req.files().is_none());
        assert_eq!(reads.load(Ordering::SeqCst), after_first);
    }

    #[test]
    fn unrecognized_content_type_skips_the_reader() {
        let (env, reads) = counted_env("application/json", b"{}");
        let req = Request::new(env);
        assert!(req.form().is_none());
        assert!(req.files().is_none());
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }
}
