//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from how
//! paths are resolved on disk.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;

// Re-export commonly used items
pub use cors::apply_cors_headers;
pub use response::{
    build_304_response, build_404_response, build_500_response, build_501_response,
    build_options_response, build_redirect_response,
};

/// Value of the `Server` header on every response
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Body type of every response: in-memory pages or a file streamed from disk
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Body holding bytes already in memory
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}
