//! Request handler module
//!
//! Method dispatch, CORS stamping, and the static file behaviour behind
//! `GET`/`HEAD`.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
