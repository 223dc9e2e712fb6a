//! End-to-end tests over a real bound listener and raw HTTP/1.1.

use std::net::SocketAddr;

use pylon::{App, Reply, Request, Server, Shutdown, middleware};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

async fn spawn_server(app: App) -> (SocketAddr, Shutdown, JoinHandle<Result<(), pylon::Error>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::from_listener(listener);
    let shutdown = server.shutdown_handle();
    let task = tokio::spawn(server.serve(app));
    (addr, shutdown, task)
}

/// Sends one HTTP/1.1 request with `connection: close` and reads the whole
/// response.
async fn exchange(addr: SocketAddr, target: &str, extra_header: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {target} HTTP/1.1\r\nhost: localhost\r\n{extra_header}connection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

async fn get(addr: SocketAddr, target: &str) -> String {
    exchange(addr, target, "").await
}

fn demo_app() -> App {
    App::new()
        .route("/hello", |_req: Request| async { Reply::text("hello") })
        .unwrap()
        .route_query("/echo", "x", |x: i32| async move { Reply::text(x.to_string()) })
        .unwrap()
}

#[tokio::test]
async fn registered_route_answers_200() {
    let (addr, shutdown, task) = spawn_server(demo_app()).await;

    let response = get(addr, "/hello").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.contains("content-type: text/plain; charset=utf-8"));
    assert!(response.ends_with("hello"));

    shutdown.stop();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn unregistered_route_gets_the_html_404_page() {
    let (addr, shutdown, task) = spawn_server(demo_app()).await;

    let response = get(addr, "/nowhere").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");
    assert!(response.contains("content-type: text/html; charset=utf-8"));
    assert!(response.contains("<h1>404 Not Found</h1>"));

    shutdown.stop();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn typed_binding_round_trip() {
    let (addr, shutdown, task) = spawn_server(demo_app()).await;

    let ok = get(addr, "/echo?x=42").await;
    assert!(ok.starts_with("HTTP/1.1 200 OK\r\n"), "{ok}");
    assert!(ok.ends_with("42"));

    let bad = get(addr, "/echo?x=notanumber").await;
    assert!(bad.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{bad}");

    let missing = get(addr, "/echo").await;
    assert!(missing.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{missing}");

    shutdown.stop();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn auth_middleware_gates_the_whole_app() {
    let app = demo_app().wrap(middleware::RequireAuth);
    let (addr, shutdown, task) = spawn_server(app).await;

    let denied = get(addr, "/hello").await;
    assert!(denied.starts_with("HTTP/1.1 401 Unauthorized\r\n"), "{denied}");

    let allowed = exchange(addr, "/hello", "authorization: Bearer token\r\n").await;
    assert!(allowed.starts_with("HTTP/1.1 200 OK\r\n"), "{allowed}");

    shutdown.stop();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn custom_not_found_page_is_served() {
    let app = demo_app().not_found_page("<h1>gone fishing</h1>");
    let (addr, shutdown, task) = spawn_server(app).await;

    let response = get(addr, "/nowhere").await;
    assert!(response.contains("gone fishing"), "{response}");

    shutdown.stop();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn stop_is_idempotent() {
    let (addr, shutdown, task) = spawn_server(demo_app()).await;

    // Make sure the server is actually up before stopping it.
    let response = get(addr, "/hello").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    shutdown.stop();
    task.await.unwrap().unwrap();

    // Stopping an already-stopped server must not panic.
    shutdown.stop();
    shutdown.stop();

    // The listener is closed: new connections are refused.
    assert!(TcpStream::connect(addr).await.is_err());
}
