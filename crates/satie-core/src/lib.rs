// src/lib.rs
pub mod http;
pub mod multimap;
pub mod multipart;
pub mod body;
pub mod cookie;
pub mod request;
pub mod response;
pub mod router;
pub mod error;
pub mod dispatch;
pub mod parser;
pub mod server;
pub mod config;
pub mod logging;

// Re-exports for users
pub use body::UploadedFile;
pub use config::ServerConfig;
pub use cookie::Cookie;
pub use dispatch::Dispatcher;
pub use error::{HandlerResult, HttpError, ServeError, ServeResult};
pub use http::{Method, Methods};
pub use multimap::MultiMap;
pub use request::{Context, Request, RequestEnv};
pub use response::Response;
pub use router::{Handler, Match, PathParams, Router};
pub use server::Server;
