// src/cookie.rs
use crate::multimap::MultiMap;
use std::time::SystemTime;

/// Attributes of one `Set-Cookie` header. Build with `Cookie::new` and the
/// consuming setters, then hand it to `Response::set_cookie`.
#[derive(Debug, Clone)]
pub struct Cookie {
    pub value: String,
    pub max_age: Option<i64>,
    pub expires: Option<SystemTime>,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
}

impl Cookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            max_age: None,
            expires: None,
            path: "/".to_string(),
            domain: None,
            secure: false,
        }
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Absolute expiry time, rendered as an RFC 1123 GMT date on the wire.
    pub fn expires(mut self, at: SystemTime) -> Self {
        self.expires = Some(at);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// One `Set-Cookie` header value. Attribute order is fixed; unset
    /// attributes are omitted.
    pub(crate) fn render(&self, name: &str) -> String {
        let mut out = format!("{}={}", name, self.value);
        if let Some(age) = self.max_age {
            out.push_str("; Max-Age=");
            out.push_str(&age.to_string());
        }
        if let Some(at) = self.expires {
            out.push_str("; Expires=");
            out.push_str(&httpdate::fmt_http_date(at));
        }
        if !self.path.is_empty() {
            out.push_str("; Path=");
            out.push_str(&self.path);
        }
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Parse an inbound `Cookie` header into an ordered multimap. Malformed
/// pairs are skipped, so a broken header degrades to a partial or empty set
/// instead of an error.
pub fn parse_cookie_header(raw: &str) -> MultiMap<String> {
    let mut map = MultiMap::new();
    for pair in raw.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('"');
        map.append(name.to_string(), value.to_string());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn renders_value_and_default_path() {
        let c = Cookie::new("100");
        assert_eq!(c.render("count"), "count=100; Path=/");
    }

    #[test]
    fn renders_all_attributes_in_order() {
        let c = Cookie::new("s1")
            .max_age(3600)
            .expires(UNIX_EPOCH + Duration::from_secs(784_111_777))
            .path("/app")
            .domain("satie.dev")
            .secure();
        assert_eq!(
            c.render("session"),
            "session=s1; Max-Age=3600; Expires=Sun, 06 Nov 1994 08:49:37 GMT; \
             Path=/app; Domain=satie.dev; Secure"
        );
    }

    #[test]
    fn parses_cookie_header() {
        let m = parse_cookie_header("a=1; b=\"two\"; a=3");
        assert_eq!(m.get("a").map(String::as_str), Some("3"));
        assert_eq!(m.get_all("a").len(), 2);
        assert_eq!(m.get("b").map(String::as_str), Some("two"));
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let m = parse_cookie_header("orphan; =nameless; ok=yes");
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("ok").map(String::as_str), Some("yes"));
    }
}
