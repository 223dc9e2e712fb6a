//! Renderable handler results.
//!
//! Handlers return a [`Reply`]: an immutable value that carries everything a
//! response needs (status, content type, body) but performs no I/O until the
//! routing stage calls [`render`](Reply::render) — exactly once per request.
//! New kinds of response are added by extending the enum, not by subclassing
//! anything.

use http::StatusCode;

use crate::response::ResponseState;

pub(crate) const NOT_FOUND_PAGE: &str = "<!doctype html>\n<html>\n<head><title>404 Not Found</title></head>\n<body>\n<h1>404 Not Found</h1>\n<p>The requested path was not found on this server.</p>\n</body>\n</html>\n";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// An immutable, renderable response value.
///
/// ```rust
/// use pylon::Reply;
///
/// Reply::text("hello");
/// Reply::json(br#"{"id":1}"#.to_vec());
/// Reply::status(http::StatusCode::NO_CONTENT);
/// Reply::bad_request("missing query parameter `x`");
/// ```
pub enum Reply {
    /// `200 OK` with a `text/plain` body.
    Text(String),
    /// `200 OK` with an `application/json` body. Pass bytes straight from
    /// your serialiser — pylon does not touch them.
    Json(Vec<u8>),
    /// Any status with a short `text/plain` explanation.
    Message(StatusCode, String),
    /// A bare status, no body.
    Status(StatusCode),
    /// `404` with the built-in HTML page.
    NotFound,
}

impl Reply {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }

    pub fn json(body: Vec<u8>) -> Self {
        Self::Json(body)
    }

    pub fn status(code: StatusCode) -> Self {
        Self::Status(code)
    }

    /// `400 Bad Request` with a short plain-text explanation.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Message(StatusCode::BAD_REQUEST, message.into())
    }

    /// `500 Internal Server Error` with a short plain-text explanation.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Message(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }

    /// Writes this reply onto the response sink: status first, then
    /// content-type, content-length, and the body bytes.
    pub fn render(self, response: &mut ResponseState) {
        match self {
            Self::Text(body) => {
                response.set_status(StatusCode::OK);
                response.write_body(TEXT_PLAIN, body);
            }
            Self::Json(body) => {
                response.set_status(StatusCode::OK);
                response.write_body(APPLICATION_JSON, body);
            }
            Self::Message(status, body) => {
                response.set_status(status);
                response.write_body(TEXT_PLAIN, body);
            }
            Self::Status(status) => {
                response.set_status(status);
            }
            Self::NotFound => {
                response.set_status(StatusCode::NOT_FOUND);
                response.write_body(TEXT_HTML, NOT_FOUND_PAGE);
            }
        }
    }
}

// ── IntoReply ─────────────────────────────────────────────────────────────────

/// Conversion into a [`Reply`].
///
/// Lets handlers return plain values:
///
/// ```rust,no_run
/// # use pylon::Request;
/// async fn hello(_req: Request) -> &'static str {
///     "hello"
/// }
/// ```
///
/// Fallible handlers return `Result`; the `Err` arm becomes a `500` with the
/// error's display text, so a handler fault never takes the server down:
///
/// ```rust,no_run
/// # use pylon::{Reply, Request};
/// async fn lookup(_req: Request) -> Result<Reply, std::io::Error> {
///     Ok(Reply::text("found"))
/// }
/// ```
pub trait IntoReply {
    fn into_reply(self) -> Reply;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Reply {
        self
    }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> Reply {
        Reply::text(self)
    }
}

impl IntoReply for String {
    fn into_reply(self) -> Reply {
        Reply::text(self)
    }
}

impl IntoReply for StatusCode {
    fn into_reply(self) -> Reply {
        Reply::status(self)
    }
}

impl<R, E> IntoReply for Result<R, E>
where
    R: IntoReply,
    E: std::fmt::Display,
{
    fn into_reply(self) -> Reply {
        match self {
            Ok(reply) => reply.into_reply(),
            Err(e) => Reply::internal_error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{CONTENT_LENGTH, CONTENT_TYPE};

    fn rendered(reply: Reply) -> ResponseState {
        let mut response = ResponseState::new();
        reply.render(&mut response);
        response
    }

    #[test]
    fn text_is_plain_ok() {
        let response = rendered(Reply::text("hello"));
        assert_eq!(response.status(), StatusCode::OK);
        let http = response.into_http();
        assert_eq!(http.headers().get(CONTENT_TYPE).unwrap(), TEXT_PLAIN);
        assert_eq!(http.headers().get(CONTENT_LENGTH).unwrap(), "5");
    }

    #[test]
    fn json_sets_content_type() {
        let response = rendered(Reply::json(b"{}".to_vec()));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.into_http().headers().get(CONTENT_TYPE).unwrap(), APPLICATION_JSON);
    }

    #[test]
    fn not_found_renders_html_page() {
        let response = rendered(Reply::NotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.has_body());
        assert_eq!(response.into_http().headers().get(CONTENT_TYPE).unwrap(), TEXT_HTML);
    }

    #[test]
    fn status_has_no_body() {
        let response = rendered(Reply::status(StatusCode::NO_CONTENT));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(!response.has_body());
    }

    #[test]
    fn result_err_becomes_500() {
        let faulty: Result<Reply, std::io::Error> =
            Err(std::io::Error::other("backend unavailable"));
        let response = rendered(faulty.into_reply());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.has_body());
    }
}
