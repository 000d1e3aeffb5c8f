use std::io::{self, Write};

use serde_json::{json, Value};

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Response payload plus the content type it implies.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Html(String),
    Text(String),
}

/// Response produced by a middleware stage or terminal handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl HandlerResponse {
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(body),
        }
    }

    #[must_use]
    pub fn html(status: u16, markup: String) -> Self {
        Self {
            status,
            body: ResponseBody::Html(markup),
        }
    }

    #[must_use]
    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Text(text.into()),
        }
    }

    /// JSON error body of the shape `{ "error": message }`.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self.body {
            ResponseBody::Json(_) => "application/json",
            ResponseBody::Html(_) => "text/html",
            ResponseBody::Text(_) => "text/plain",
        }
    }

    #[must_use]
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            ResponseBody::Json(value) => serde_json::to_vec(value).unwrap_or_default(),
            ResponseBody::Html(markup) => markup.clone().into_bytes(),
            ResponseBody::Text(text) => text.clone().into_bytes(),
        }
    }
}

/// Serialize a response onto the wire as HTTP/1.1, one response per
/// connection.
pub fn write_response(out: &mut impl Write, response: &HandlerResponse) -> io::Result<()> {
    let body = response.body_bytes();
    write!(
        out,
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        status_reason(response.status),
        response.content_type(),
        body.len()
    )?;
    out.write_all(&body)?;
    out.flush()
}
