// Configuration module entry point
// Layered settings: built-in defaults, then CORS_SERVER_* environment
// variables, then the port given on the command line.

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

/// Port used when neither the environment nor the command line sets one
pub const DEFAULT_PORT: u16 = 3001;

/// Environment variable prefix, e.g. `CORS_SERVER_SERVER__ROOT=/srv/www`
pub const ENV_PREFIX: &str = "CORS_SERVER";

impl Config {
    /// Load configuration from the process environment.
    pub fn load(port_override: Option<u16>) -> Result<Self> {
        Self::load_with(port_override, Self::environment())
    }

    /// Load configuration from an explicit environment source.
    pub fn load_with(port_override: Option<u16>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(env)
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?;

        if let Some(port) = port_override {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| Error::InvalidAddress(addr))
    }

    /// Resolve and canonicalise the directory to serve.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        let path = match &self.server.root {
            Some(p) => p.clone(),
            None => std::env::current_dir()?,
        };

        let canonical = path.canonicalize().map_err(|source| Error::Root {
            path: path.clone(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(Error::Root {
                path,
                source: std::io::Error::other("not a directory"),
            });
        }
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_with(None, env_from(&[])).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert!(cfg.server.root.is_none());
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert!(cfg.performance.keep_alive);
        assert!(cfg.performance.workers.is_none());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let cfg = Config::load_with(
            None,
            env_from(&[
                ("CORS_SERVER_SERVER__PORT", "5000"),
                ("CORS_SERVER_SERVER__HOST", "127.0.0.1"),
                ("CORS_SERVER_LOGGING__ACCESS_LOG", "false"),
                ("CORS_SERVER_PERFORMANCE__WORKERS", "2"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.performance.workers, Some(2));
    }

    #[test]
    fn test_cli_port_wins_over_environment() {
        let cfg =
            Config::load_with(Some(4000), env_from(&[("CORS_SERVER_SERVER__PORT", "5000")]))
                .unwrap();
        assert_eq!(cfg.server.port, 4000);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_with(Some(4000), env_from(&[])).unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap(), "0.0.0.0:4000".parse().unwrap());
    }

    #[test]
    fn test_invalid_host() {
        let cfg = Config::load_with(None, env_from(&[("CORS_SERVER_SERVER__HOST", "not a host")]))
            .unwrap();
        assert!(matches!(cfg.get_socket_addr(), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_resolve_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_with(None, env_from(&[])).unwrap();
        cfg.server.root = Some(dir.path().to_path_buf());
        assert_eq!(cfg.resolve_root().unwrap(), dir.path().canonicalize().unwrap());

        cfg.server.root = Some(dir.path().join("missing"));
        assert!(matches!(cfg.resolve_root(), Err(Error::Root { .. })));

        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        cfg.server.root = Some(file);
        assert!(matches!(cfg.resolve_root(), Err(Error::Root { .. })));
    }
}
