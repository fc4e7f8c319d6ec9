// src/http.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
    Connect,
    Unknown,
}

impl Method {
    pub fn from_bytes(b: &[u8]) -> Self {
        match b {
            b"GET" => Method::Get,
            b"POST" => Method::Post,
            b"PUT" => Method::Put,
            b"DELETE" => Method::Delete,
            b"PATCH" => Method::Patch,
            b"HEAD" => Method::Head,
            b"OPTIONS" => Method::Options,
            b"TRACE" => Method::Trace,
            b"CONNECT" => Method::Connect,
            _ => Method::Unknown,
        }
    }

    /// Case-insensitive parse; the wire and the env contract both carry
    /// uppercase semantics.
    pub fn parse(s: &str) -> Self {
        let mut buf = [0u8; 8];
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > buf.len() {
            return Method::Unknown;
        }
        for (i, b) in bytes.iter().enumerate() {
            buf[i] = b.to_ascii_uppercase();
        }
        Method::from_bytes(&buf[..bytes.len()])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
            Method::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method requirement attached to a route: a single method or a set.
#[derive(Debug, Clone)]
pub enum Methods {
    One(Method),
    Any(Vec<Method>),
}

impl Methods {
    pub fn allows(&self, m: Method) -> bool {
        match self {
            Methods::One(only) => *only == m,
            Methods::Any(set) => set.contains(&m),
        }
    }
}

impl From<Method> for Methods {
    fn from(m: Method) -> Self {
        Methods::One(m)
    }
}

impl From<Vec<Method>> for Methods {
    fn from(set: Vec<Method>) -> Self {
        Methods::Any(set)
    }
}

impl From<&[Method]> for Methods {
    fn from(set: &[Method]) -> Self {
        Methods::Any(set.to_vec())
    }
}

impl<const N: usize> From<[Method; N]> for Methods {
    fn from(set: [Method; N]) -> Self {
        Methods::Any(set.to_vec())
    }
}

/// Full status line ("404 Not Found") for a status code. Codes outside the
/// table render as "UNKNOWN".
pub fn status_line(code: u16) -> &'static str {
    match code {
        100 => "100 Continue",
        101 => "101 Switching Protocols",
        200 => "200 OK",
        201 => "201 Created",
        202 => "202 Accepted",
        203 => "203 Non-Authoritative Information",
        204 => "204 No Content",
        205 => "205 Reset Content",
        206 => "206 Partial Content",
        207 => "207 Multi-Status",
        300 => "300 Multiple Choices",
        301 => "301 Moved Permanently",
        302 => "302 Found",
        303 => "303 See Other",
        304 => "304 Not Modified",
        305 => "305 Use Proxy",
        307 => "307 Temporary Redirect",
        400 => "400 Bad Request",
        401 => "401 Unauthorized",
        402 => "402 Payment Required",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        405 => "405 Method Not Allowed",
        406 => "406 Not Acceptable",
        407 => "407 Proxy Authentication Required",
        408 => "408 Request Timeout",
        409 => "409 Conflict",
        410 => "410 Gone",
        411 => "411 Length Required",
        412 => "412 Precondition Failed",
        413 => "413 Request Entity Too Large",
        414 => "414 Request-Uri Too Long",
        415 => "415 Unsupported Media Type",
        416 => "416 Requested Range Not Satisfiable",
        417 => "417 Expectation Failed",
        500 => "500 Internal Server Error",
        501 => "501 Not Implemented",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        504 => "504 Gateway Timeout",
        505 => "505 Http Version Not Supported",
        _ => "UNKNOWN",
    }
}
