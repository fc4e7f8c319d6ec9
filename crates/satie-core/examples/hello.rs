// examples/hello.rs
use satie_core::logging::init_logging;
use satie_core::{Context, HandlerResult, Response, Router, Server};

fn index(_ctx: Context) -> HandlerResult {
    Ok(Response::ok(
        "<form method=\"post\" action=\"/works/\">\
         <input name=\"title\"><input type=\"submit\"></form>",
    ))
}

fn hello(ctx: Context) -> HandlerResult {
    let name = ctx.param("name").unwrap_or("world");
    Ok(format!("hello {}", name).into())
}

fn submit(ctx: Context) -> HandlerResult {
    let title = ctx
        .req
        .form()
        .and_then(|f| f.get("title").cloned())
        .unwrap_or_default();
    Ok(Response::text(200, format!("saved {}", title)))
}

fn main() {
    init_logging();

    let mut router = Router::new();
    router.get("/", index);
    router.get("/hello/(?P<name>[a-z]+)", hello);
    router.post("/works/", submit);

    println!("Starting Satie on 0.0.0.0:8000...");
    Server::bind("0.0.0.0:8000").serve(router).unwrap();
}
