// src/dispatch.rs
use crate::error::HttpError;
use crate::request::{Context, Request, RequestEnv};
use crate::response::Response;
use crate::router::{Handler, Match, Router};
use std::sync::Arc;
use tracing::{debug, error};

/// Turns one request environment into one emitted response, running the
/// match → invoke → recover chain. Stateless apart from the shared router;
/// clone one per worker thread.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch one request. `emit` receives the status line and the final
    /// headers exactly once; the body chunks are the return value. No
    /// handler failure or panic escapes this call — every path ends in a
    /// finalized response.
    pub fn dispatch(
        &self,
        env: RequestEnv,
        emit: impl FnOnce(&str, &[(&'static str, String)]),
    ) -> Vec<Vec<u8>> {
        let response = match self.run(env) {
            Ok(response) => response,
            Err(failure) => self.recover(failure),
        };
        let (status_line, headers, chunks) = response.finalize();
        emit(status_line, &headers);
        chunks
    }

    fn run(&self, env: RequestEnv) -> Result<Response, HttpError> {
        let req = Request::new(env);
        let method = req.method();
        let (route, params) = match self.router.match_route(method, req.path()) {
            Match::Route(route, params) => (route, params),
            Match::MethodNotAllowed => {
                return Err(HttpError::method_not_allowed(format!(
                    "{} not allowed for {}",
                    method,
                    req.path()
                )));
            }
            Match::NotFound => {
                return Err(HttpError::not_found(format!("no route for {}", req.path())));
            }
        };
        invoke(route.handler, Context { req, params })
    }

    /// The error-fallback chain: a registered handler for the failure's
    /// status produces the body, anything else ends in the fixed 404.
    fn recover(&self, failure: HttpError) -> Response {
        debug!(status = failure.status, message = %failure.message, "request failed");
        let Some(handler) = self.router.error_handler(failure.status) else {
            return Response::not_found();
        };
        match invoke_error_handler(handler) {
            Some(body) => {
                let mut resp = Response::new(failure.status, "text/html");
                resp.write(body);
                resp
            }
            None => Response::not_found(),
        }
    }
}

#[cfg(feature = "catch-panic")]
fn invoke(handler: Handler, ctx: Context) -> Result<Response, HttpError> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler(ctx))) {
        Ok(result) => result,
        Err(_) => {
            error!("handler panicked");
            Err(HttpError::internal("handler panicked"))
        }
    }
}

#[cfg(not(feature = "catch-panic"))]
fn invoke(handler: Handler, ctx: Context) -> Result<Response, HttpError> {
    handler(ctx)
}

#[cfg(feature = "catch-panic")]
fn invoke_error_handler(handler: crate::router::ErrorHandler) -> Option<String> {
    match std::panic::catch_unwind(handler) {
        Ok(body) => Some(body),
        Err(_) => {
            error!("error handler panicked");
            None
        }
    }
}

#[cfg(not(feature = "catch-panic"))]
fn invoke_error_handler(handler: crate::router::ErrorHandler) -> Option<String> {
    Some(handler())
}
