// examples/error_pages.rs
use satie_core::logging::init_logging;
use satie_core::{Context, HandlerResult, HttpError, Response, Router, Server};

fn index(_ctx: Context) -> HandlerResult {
    Ok(Response::ok(
        "Try /club/ (403), /broken/ (500) or any unregistered path (404).",
    ))
}

fn members_only(_ctx: Context) -> HandlerResult {
    Err(HttpError::new(403, "no membership card"))
}

fn broken(_ctx: Context) -> HandlerResult {
    panic!("this handler always panics");
}

fn not_found_page() -> String {
    "<h1>There is nothing here.</h1>".to_string()
}

fn forbidden_page() -> String {
    "<h1>Members only.</h1>".to_string()
}

fn crashed_page() -> String {
    "<h1>Something broke on our side.</h1>".to_string()
}

fn main() {
    init_logging();

    let mut router = Router::new();
    router.get("/", index);
    router.get("/club/", members_only);
    router.get("/broken/", broken);
    router.on_error(404, not_found_page);
    router.on_error(403, forbidden_page);
    router.on_error(500, crashed_page);

    println!("Starting Satie on 0.0.0.0:8000...");
    Server::bind("0.0.0.0:8000").workers(1).serve(router).unwrap();
}
