// src/router.rs
use crate::error::HandlerResult;
use crate::http::{Method, Methods};
use crate::request::Context;
use regex::Regex;
use tracing::debug;

/// A route handler: a plain function over the request context.
pub type Handler = fn(Context) -> HandlerResult;

/// Fallback body producer for one status code. Takes no request context;
/// error pages are uniform per status.
pub type ErrorHandler = fn() -> String;

/// One registered route: method requirement, anchored pattern, the names of
/// the pattern's captures in order, and the handler.
pub struct Route {
    pub methods: Methods,
    pub pattern: Regex,
    pub param_names: Vec<String>,
    pub handler: Handler,
}

/// Named captures from a matched path. `get` returns the last occurrence,
/// consistent with the crate's other mappings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Outcome of a table scan.
pub enum Match<'r> {
    /// A route matched; carries the captures.
    Route(&'r Route, PathParams),
    /// Some route's path matched but no route allowed the method.
    MethodNotAllowed,
    /// No route's path matched at all.
    NotFound,
}

/// Ordered route table plus the per-status error-handler table. Built during
/// application setup, read-only while serving; handlers are fn pointers and
/// patterns are compiled regexes, so a `Router` shares freely across worker
/// threads.
#[derive(Default)]
pub struct Router {
    base: String,
    routes: Vec<Route>,
    error_handlers: Vec<(u16, ErrorHandler)>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// A router whose templates are all mounted under `base` (given a
    /// leading `/` when missing).
    pub fn with_base(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.is_empty() && !base.starts_with('/') {
            base.insert(0, '/');
        }
        Self {
            base,
            ..Self::default()
        }
    }

    /// Register a route. `template` is a regex over the normalized request
    /// path; the router base is prepended, a trailing `/` appended when
    /// missing, and the result anchored as `^…$`. Registration order is
    /// match-priority order.
    ///
    /// Panics on a pattern that does not compile — registration runs at
    /// startup, before serving begins.
    pub fn add(
        &mut self,
        methods: impl Into<Methods>,
        template: &str,
        handler: Handler,
    ) -> &mut Self {
        let methods = methods.into();
        let mut template = format!("{}{}", self.base, template);
        if !template.ends_with('/') {
            template.push('/');
        }
        let anchored = format!("^{}$", template);
        let pattern = Regex::new(&anchored).expect("invalid route pattern");
        let param_names = pattern
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();
        debug!(methods = ?methods, pattern = %anchored, "route registered");
        self.routes.push(Route {
            methods,
            pattern,
            param_names,
            handler,
        });
        self
    }

    pub fn get(&mut self, template: &str, handler: Handler) -> &mut Self {
        self.add(Method::Get, template, handler)
    }

    pub fn post(&mut self, template: &str, handler: Handler) -> &mut Self {
        self.add(Method::Post, template, handler)
    }

    pub fn put(&mut self, template: &str, handler: Handler) -> &mut Self {
        self.add(Method::Put, template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: Handler) -> &mut Self {
        self.add(Method::Delete, template, handler)
    }

    /// Register the fallback body for a status code. Re-registering a code
    /// replaces its handler.
    pub fn on_error(&mut self, status: u16, handler: ErrorHandler) -> &mut Self {
        match self.error_handlers.iter_mut().find(|(s, _)| *s == status) {
            Some((_, slot)) => *slot = handler,
            None => self.error_handlers.push((status, handler)),
        }
        self
    }

    pub fn error_handler(&self, status: u16) -> Option<ErrorHandler> {
        self.error_handlers
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, h)| *h)
    }

    /// Scan the table in registration order. A route whose path matches but
    /// whose method does not is skipped and remembered, so a later route for
    /// the same path under the right method still wins; only an exhausted
    /// scan reports the mismatch.
    pub fn match_route(&self, method: Method, path: &str) -> Match<'_> {
        let mut path_hit = false;
        for route in &self.routes {
            let Some(caps) = route.pattern.captures(path) else {
                continue;
            };
            if !route.methods.allows(method) {
                path_hit = true;
                continue;
            }
            let entries = route
                .param_names
                .iter()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect();
            debug!(method = %method, path = %path, pattern = %route.pattern, "route matched");
            return Match::Route(route, PathParams { entries });
        }
        if path_hit {
            debug!(method = %method, path = %path, "path matched, method not allowed");
            Match::MethodNotAllowed
        } else {
            debug!(method = %method, path = %path, "no route matched");
            Match::NotFound
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Request, RequestEnv};

    fn ctx() -> Context {
        Context {
            req: Request::new(RequestEnv::default()),
            params: PathParams::default(),
        }
    }

    fn body_of(handler: Handler) -> Vec<u8> {
        let resp = handler(ctx()).expect("handler ok");
        let (_, _, chunks) = resp.finalize();
        chunks.concat()
    }

    fn alpha(_: Context) -> HandlerResult {
        Ok("alpha".into())
    }

    fn beta(_: Context) -> HandlerResult {
        Ok("beta".into())
    }

    #[test]
    fn first_registered_route_wins() {
        let mut router = Router::new();
        router.get("/works/", alpha);
        router.get("/works/", beta);

        match router.match_route(Method::Get, "/works/") {
            Match::Route(route, _) => assert_eq!(body_of(route.handler), b"alpha"),
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn later_route_reachable_when_earlier_method_mismatches() {
        let mut router = Router::new();
        router.post("/works/", alpha);
        router.get("/works/", beta);

        match router.match_route(Method::Get, "/works/") {
            Match::Route(route, _) => assert_eq!(body_of(route.handler), b"beta"),
            _ => panic!("expected the GET route"),
        }
    }

    #[test]
    fn exhausted_scan_reports_method_not_allowed() {
        let mut router = Router::new();
        router.post("/works/", alpha);

        assert!(matches!(
            router.match_route(Method::Put, "/works/"),
            Match::MethodNotAllowed
        ));
        assert!(matches!(
            router.match_route(Method::Get, "/missing/"),
            Match::NotFound
        ));
    }

    #[test]
    fn named_captures_become_params() {
        let mut router = Router::new();
        router.get("/hello/(?P<name>.+)", alpha);

        match router.match_route(Method::Get, "/hello/alice/") {
            Match::Route(_, params) => {
                assert_eq!(params.get("name"), Some("alice"));
                assert_eq!(params.len(), 1);
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn templates_gain_trailing_slash_and_base() {
        let mut router = Router::with_base("admin");
        router.get("/users", alpha);

        assert!(matches!(
            router.match_route(Method::Get, "/admin/users/"),
            Match::Route(..)
        ));
        assert!(matches!(
            router.match_route(Method::Get, "/users/"),
            Match::NotFound
        ));
    }

    #[test]
    fn method_sets_match_any_member() {
        let mut router = Router::new();
        router.add([Method::Get, Method::Post], "/both/", alpha);

        assert!(matches!(
            router.match_route(Method::Post, "/both/"),
            Match::Route(..)
        ));
        assert!(matches!(
            router.match_route(Method::Get, "/both/"),
            Match::Route(..)
        ));
    }

    #[test]
    fn error_handler_registration_replaces() {
        fn first() -> String {
            "first".to_string()
        }
        fn second() -> String {
            "second".to_string()
        }

        let mut router = Router::new();
        router.on_error(404, first);
        router.on_error(404, second);

        let handler = router.error_handler(404).expect("registered");
        assert_eq!(handler(), "second");
        assert!(router.error_handler(500).is_none());
    }
}
