// examples/cookies.rs
use satie_core::logging::init_logging;
use satie_core::{Context, Cookie, HandlerResult, Response, Router, Server};

fn visit(ctx: Context) -> HandlerResult {
    let count: u32 = ctx
        .req
        .cookie("count")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
        + 1;

    let mut resp = Response::ok(format!("You have visited {} time(s).", count));
    resp.set_cookie("count", Cookie::new(count.to_string()).max_age(3600));
    Ok(resp)
}

fn reset(_ctx: Context) -> HandlerResult {
    let mut resp = Response::redirect_to("/");
    resp.delete_cookie("count");
    Ok(resp)
}

fn main() {
    init_logging();

    let mut router = Router::new();
    router.get("/", visit);
    router.get("/reset/", reset);

    println!("Starting Satie on 0.0.0.0:8000...");
    Server::bind("0.0.0.0:8000").workers(1).serve(router).unwrap();
}
