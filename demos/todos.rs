//! Minimal pylon example — a todos API with a typed query parameter.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example todos
//!
//! Try:
//!   curl http://localhost:3000/todos
//!   curl http://localhost:3000/todo?id=1
//!   curl http://localhost:3000/todo?id=nope
//!   curl http://localhost:3000/missing

use pylon::{App, Reply, Request, Server, middleware};

#[tokio::main]
async fn main() -> Result<(), pylon::Error> {
    tracing_subscriber::fmt::init();

    let app = App::new()
        .wrap(middleware::Trace)
        .route("/todos", list_todos)?
        .route_query("/todo", "id", get_todo)?;

    Server::bind("0.0.0.0:3000").serve(app).await
}

// The fixed demo data set: (id, title, completed).
const TODOS: &[(u32, &str, bool)] = &[(1, "Buy milk", false), (2, "Buy bread", true)];

// GET /todos
//
// Reply::json takes Vec<u8> — pass bytes from your serialiser; pylon does
// not touch them.
async fn list_todos(_req: Request) -> Reply {
    let items: Vec<String> = TODOS
        .iter()
        .map(|(id, title, completed)| {
            format!(r#"{{"id":{id},"title":"{title}","completed":{completed}}}"#)
        })
        .collect();
    Reply::json(format!("[{}]", items.join(",")).into_bytes())
}

// GET /todo?id=1 — the binder parses `id` as u32 before this runs; a missing
// or non-numeric id never gets here, it becomes a 400 upstream.
async fn get_todo(id: u32) -> Reply {
    match TODOS.iter().find(|&&(todo_id, _, _)| todo_id == id) {
        Some(&(id, title, completed)) => Reply::json(
            format!(r#"{{"id":{id},"title":"{title}","completed":{completed}}}"#).into_bytes(),
        ),
        None => Reply::NotFound,
    }
}
