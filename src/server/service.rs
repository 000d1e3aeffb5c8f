use std::io::BufReader;
use std::net::TcpListener;

use tracing::{error, info, warn};

use super::http::read_request;
use super::request::{parse_request, ParsedRequest};
use super::response::{write_response, HandlerResponse};
use crate::context::RequestContext;
use crate::middleware::Chain;
use crate::router::Router;
use crate::store::RecordStore;

/// Ties the middleware chain, the router, and the record store together for
/// one transport.
///
/// The service owns the store outright. Requests are handled by a single
/// logical worker, which is what stands in for synchronization: the store
/// itself carries no lock, by design.
pub struct AppService {
    chain: Chain,
    router: Router,
    store: RecordStore,
}

impl AppService {
    #[must_use]
    pub fn new(chain: Chain, router: Router, store: RecordStore) -> Self {
        Self {
            chain,
            router,
            store,
        }
    }

    /// Handle one request end to end.
    ///
    /// A fresh [`RequestContext`] is created for the request and discarded
    /// with the response. The chain runs first; on fall-through the router
    /// resolves the terminal handler, and no match is the 404 response. A
    /// chain contract violation is fatal to this request only and maps to a
    /// 500-class response.
    pub fn handle(&mut self, req: &ParsedRequest) -> HandlerResponse {
        let mut ctx = RequestContext::new();
        match self.chain.run(req, &mut ctx) {
            Ok(Some(response)) => response,
            Ok(None) => match self.router.resolve(&req.method, &req.path) {
                Some(matched) => {
                    matched
                        .handler
                        .handle(req, &matched.path_params, &ctx, &mut self.store)
                }
                None => HandlerResponse::error(404, "not found"),
            },
            Err(err) => {
                error!(error = %err, method = %req.method, path = %req.path, "Middleware chain failed");
                HandlerResponse::error(500, "middleware contract violation")
            }
        }
    }

    /// Accept loop: one connection at a time, one request per connection.
    ///
    /// Read or parse failures abandon that connection and the loop moves on;
    /// subsequent requests are unaffected.
    pub fn serve(mut self, addr: &str) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr)?;
        info!(addr = %addr, "Server started");
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
            let req = match parse_request(&raw, &client_addr) {
                Ok(req) => req,
                Err(err) => {
                    warn!(client = %client_addr, error = %err, "Failed to parse request");
                    continue;
                }
            };
            let response = self.handle(&req);
            info!(
                client = %client_addr,
                method = %req.method,
                path = %req.path,
                status = response.status,
                "Request handled"
            );
            if let Err(err) = write_response(&mut stream, &response) {
                warn!(client = %client_addr, error = %err, "Failed to write response");
            }
        }
        Ok(())
    }
}
