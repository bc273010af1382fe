//! Command-line surface: `cors_file_server [port]`.

use crate::error::{Error, Result};
use clap::Parser;

/// Serve the current directory over HTTP with permissive CORS headers
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TCP port to listen on (default: 3001)
    #[arg(allow_hyphen_values = true)]
    pub port: Option<String>,

    /// Anything after the port is accepted and ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub ignored: Vec<String>,
}

impl Args {
    /// Port given on the command line, if any.
    ///
    /// The raw string is kept so a bad value can be reported verbatim and
    /// mapped to exit status 1 instead of clap's usage error.
    pub fn port(&self) -> Result<Option<u16>> {
        self.port.as_deref().map(parse_port).transpose()
    }
}

/// Parse a decimal port number.
///
/// # Examples
/// ```
/// use cors_file_server::cli::parse_port;
/// assert_eq!(parse_port("4000").unwrap(), 4000);
/// assert!(parse_port("http").is_err());
/// ```
pub fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| Error::InvalidPort(raw.to_string()))
}
