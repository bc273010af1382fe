//! Static file server with permissive CORS headers.
//!
//! Serves the files beneath a root directory over HTTP/1.x, answers CORS
//! preflight requests, and stamps every response with the same three
//! `Access-Control-*` headers.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::{Error, Result};
