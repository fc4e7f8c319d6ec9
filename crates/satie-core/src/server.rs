// src/server.rs
use crate::dispatch::Dispatcher;
use crate::error::{ServeError, ServeResult};
use crate::parser::{self, ParseError};
use crate::request::RequestEnv;
use crate::router::Router;
use std::io::{self, Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

const MAX_HEAD: usize = 16 * 1024;
// Hard cap on keep-alive requests per connection
const MAX_REQUESTS_PER_CONN: u32 = 10_000;
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// Blocking HTTP/1.1 gateway over the dispatcher: a pool of worker threads
/// shares one listener, and each connection is served to completion,
/// strictly sequentially.
pub struct Server {
    host_port: String,
    workers: usize,
}

impl Server {
    pub fn bind(host_port: &str) -> Self {
        Self {
            host_port: host_port.to_string(),
            workers: num_cpus::get(),
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Serve until SIGINT. Consumes the router; registration is over once
    /// serving begins.
    pub fn serve(self, router: Router) -> ServeResult<()> {
        let listener = TcpListener::bind(&self.host_port)?;
        // Non-blocking accept lets workers notice the shutdown flag
        listener.set_nonblocking(true)?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("received SIGINT, initiating graceful shutdown");
            shutdown_clone.store(true, Ordering::SeqCst);
        })
        .map_err(|e| ServeError::Other(format!("failed to set Ctrl-C handler: {e}")))?;

        let dispatcher = Dispatcher::new(Arc::new(router));
        info!(addr = %self.host_port, workers = self.workers, "server listening");

        let mut handles = Vec::with_capacity(self.workers);
        for i in 0..self.workers {
            let listener = listener.try_clone()?;
            let dispatcher = dispatcher.clone();
            let shutdown = shutdown.clone();
            let handle = thread::Builder::new()
                .name(format!("satie-worker-{}", i))
                .spawn(move || worker_loop(i, &listener, &dispatcher, &shutdown))
                .map_err(ServeError::Io)?;
            handles.push(handle);
        }

        for handle in handles {
            let _ = handle.join();
        }
        info!("server shut down");
        Ok(())
    }
}

fn worker_loop(id: usize, listener: &TcpListener, dispatcher: &Dispatcher, shutdown: &AtomicBool) {
    debug!(worker = id, "worker started");
    while !shutdown.load(Ordering::Acquire) {
        match listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = serve_connection(stream, dispatcher, shutdown) {
                    debug!(worker = id, peer = %peer, error = %e, "connection closed with error");
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL);
            }
            Err(e) => {
                warn!(worker = id, error = %e, "accept failed");
                thread::sleep(ACCEPT_POLL);
            }
        }
    }
}

/// Everything the gateway lifts out of a parsed head before the buffer is
/// reused for the next request.
struct OwnedHead {
    method: String,
    path: String,
    query: String,
    content_type: String,
    content_length: u64,
    cookie: Option<String>,
    connection_close: bool,
    body_offset: usize,
}

fn serve_connection(
    mut stream: TcpStream,
    dispatcher: &Dispatcher,
    shutdown: &AtomicBool,
) -> ServeResult<()> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    stream.set_nodelay(true).ok();

    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    let mut served: u32 = 0;

    loop {
        // Read until the head parses; leftovers from the previous request
        // are already in the buffer.
        let head = loop {
            match parser::parse_head(&buf) {
                Ok(head) => {
                    break OwnedHead {
                        method: head.method.to_string(),
                        path: head.path.to_string(),
                        query: head.query.to_string(),
                        content_type: head.header("content-type").unwrap_or("").to_string(),
                        content_length: head.content_length(),
                        cookie: head.header("cookie").map(str::to_string),
                        connection_close: head
                            .header("connection")
                            .is_some_and(|v| v.eq_ignore_ascii_case("close")),
                        body_offset: head.body_offset,
                    };
                }
                Err(ParseError::Incomplete) => {
                    if buf.len() > MAX_HEAD {
                        return Err(ParseError::TooLarge.into());
                    }
                    // 0 is a clean close or an idle timeout between requests
                    if read_some(&mut stream, &mut buf)? == 0 {
                        return Ok(());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        };

        // Read exactly Content-Length body bytes
        let total = head.body_offset + head.content_length as usize;
        while buf.len() < total {
            if read_some(&mut stream, &mut buf)? == 0 {
                // body truncated by the peer
                return Ok(());
            }
        }
        let body = buf[head.body_offset..total].to_vec();
        buf.drain(..total);

        served += 1;
        // HTTP/1.1 defaults to keep-alive per RFC 7230
        let keep_alive = !head.connection_close
            && served < MAX_REQUESTS_PER_CONN
            && !shutdown.load(Ordering::Acquire);

        let env = RequestEnv {
            method: head.method,
            script_prefix: String::new(),
            path_info: percent_decode(&head.path),
            query_string: head.query,
            content_type: head.content_type,
            content_length: head.content_length,
            cookie_header: head.cookie,
            body: Box::new(Cursor::new(body)),
        };

        let mut wire = Vec::with_capacity(1024);
        let chunks = dispatcher.dispatch(env, |status_line, headers| {
            wire.extend_from_slice(b"HTTP/1.1 ");
            wire.extend_from_slice(status_line.as_bytes());
            wire.extend_from_slice(b"\r\nDate: ");
            wire.extend_from_slice(httpdate::fmt_http_date(SystemTime::now()).as_bytes());
            if keep_alive {
                wire.extend_from_slice(b"\r\nConnection: keep-alive\r\n");
            } else {
                wire.extend_from_slice(b"\r\nConnection: close\r\n");
            }
            for (name, value) in headers {
                wire.extend_from_slice(name.as_bytes());
                wire.extend_from_slice(b": ");
                wire.extend_from_slice(value.as_bytes());
                wire.extend_from_slice(b"\r\n");
            }
            wire.extend_from_slice(b"\r\n");
        });
        for chunk in &chunks {
            wire.extend_from_slice(chunk);
        }
        stream.write_all(&wire)?;

        if !keep_alive {
            return Ok(());
        }
    }
}

/// One read into the buffer. Returns 0 on EOF; an idle-timeout while waiting
/// between requests also reports 0 so the connection closes quietly.
fn read_some(stream: &mut TcpStream, buf: &mut Vec<u8>) -> ServeResult<usize> {
    let mut chunk = [0u8; 4096];
    match stream.read(&mut chunk) {
        Ok(n) => {
            buf.extend_from_slice(&chunk[..n]);
            Ok(n)
        }
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// The env contract carries a percent-decoded path; undecodable input is
/// passed through raw.
fn percent_decode(path: &str) -> String {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.to_string(),
    }
}
