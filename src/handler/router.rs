//! Request dispatch module
//!
//! Entry point for HTTP request processing: picks a responder by method,
//! then stamps the CORS and `Server` headers on whatever comes back.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::{
    HeaderMap, HeaderValue, CONTENT_LENGTH, IF_MODIFIED_SINCE, IF_NONE_MATCH, SERVER,
};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    fn from_parts(parts: &'a Parts) -> Self {
        Self {
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_modified_since: parts
                .headers
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: parts.headers.contains_key(IF_NONE_MATCH),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Request bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let (parts, body) = req.into_parts();
    drop(body);

    let access_entry = state.access_log.then(|| {
        AccessLogEntry::new(
            peer_addr,
            parts.method.to_string(),
            parts.uri.to_string(),
            format!("{:?}", parts.version),
        )
    });

    let mut response = dispatch(&parts, &state.root).await;
    finalize_headers(response.headers_mut());

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        // File bodies are streamed, so the declared length stands in for the size
        entry.body_bytes = if parts.method == Method::HEAD {
            Some(0)
        } else {
            response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };
        logger::log_access(&entry);
    }

    Ok(response)
}

/// Pick a responder by method
async fn dispatch(parts: &Parts, root: &Path) -> Response<ResponseBody> {
    match parts.method {
        // Preflight never touches the filesystem
        Method::OPTIONS => http::build_options_response(),
        Method::GET | Method::HEAD => {
            let ctx = RequestContext::from_parts(parts);
            static_files::serve(&ctx, root).await
        }
        ref method => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_501_response(method.as_str())
        }
    }
}

/// Headers added to every response regardless of method or status
fn finalize_headers(headers: &mut HeaderMap) {
    headers.insert(SERVER, HeaderValue::from_static(http::SERVER_NAME));
    http::apply_cors_headers(headers);
}
