//! Raw dispatch loop: the transport variant built directly on the socket
//! listener, without the router abstraction.
//!
//! Where the router resolves against a registered table, this loop branches
//! on the parsed path with ordered exact-match comparison (a sequential
//! switch, first matching case wins) and then on method within a matched
//! path. The audit-log side effect that the middleware chain carries as a
//! pluggable stage is folded in here unconditionally, before dispatch. It is
//! the simplified, non-pluggable sibling of [`AuditLogStage`]: same log file,
//! same line format, no chain.
//!
//! [`AuditLogStage`]: crate::middleware::AuditLogStage

use std::io::BufReader;
use std::net::TcpListener;
use std::path::Path;

use http::Method;
use tracing::{info, warn};

use super::http::read_request;
use super::request::parse_query_params;
use super::response::{write_response, HandlerResponse};
use crate::middleware::append_audit_line;

/// Dispatch one raw request: parse the target into path and query, append
/// the audit line, then branch.
///
/// `/favicon.ico` is answered empty without logging so browser chatter does
/// not pollute the audit log. An unmatched path produces the fixed `404`
/// body.
#[must_use]
pub fn dispatch(method: &Method, target: &str, client_addr: &str, audit_log: &Path) -> HandlerResponse {
    let path = target.split('?').next().unwrap_or("/");
    if path == "/favicon.ico" {
        return HandlerResponse::text(200, "");
    }
    append_audit_line(audit_log, client_addr, method.as_str(), path);

    let query = parse_query_params(target);
    if path == "/search" {
        let term = query.get("search_query").map(String::as_str).unwrap_or("");
        HandlerResponse::text(200, format!("Here are your results for {term}"))
    } else if path == "/signup" {
        if *method == Method::GET {
            HandlerResponse::text(200, "This is a signup form")
        } else if *method == Method::POST {
            HandlerResponse::text(200, "Successfully created")
        } else {
            HandlerResponse::text(404, "404")
        }
    } else {
        HandlerResponse::text(404, "404")
    }
}

/// Accept loop for the raw variant. One connection at a time, one request
/// per connection.
pub fn serve(addr: &str, audit_log: &Path) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)?;
    info!(addr = %addr, "Raw dispatch server started");
    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "Failed to accept connection");
                continue;
            }
        };
        let client_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let raw = match read_request(&mut BufReader::new(&mut stream)) {
            Ok(Some(raw)) => raw,
            Ok(None) => continue,
            Err(err) => {
                warn!(client = %client_addr, error = %err, "Failed to read request");
                continue;
            }
        };
        let method: Method = match raw.method.parse() {
            Ok(method) => method,
            Err(_) => {
                warn!(client = %client_addr, method = %raw.method, "Invalid HTTP method");
                continue;
            }
        };
        let response = dispatch(&method, &raw.target, &client_addr, audit_log);
        if let Err(err) = write_response(&mut stream, &response) {
            warn!(client = %client_addr, error = %err, "Failed to write response");
        }
    }
    Ok(())
}
