// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// First pause after a failed `accept()`
const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(10);
/// Longest pause between retries, e.g. while the fd table stays full
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Pause before retrying after `consecutive_errors` failed accepts in a row
///
/// Doubles from `ACCEPT_BACKOFF_BASE` up to `ACCEPT_BACKOFF_MAX`.
pub fn accept_backoff(consecutive_errors: u32) -> Duration {
    let exponent = consecutive_errors.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE
        .saturating_mul(1 << exponent)
        .min(ACCEPT_BACKOFF_MAX)
}

/// Accept connections and hand each one to its own task
///
/// Returns once `shutdown` completes. Connections already accepted keep
/// running on their tasks; nothing waits for them here.
pub async fn run_server<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut consecutive_errors = 0u32;

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        consecutive_errors = 0;
                        log::debug!("Accepted connection from {peer_addr}");
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        consecutive_errors = consecutive_errors.saturating_add(1);
                        let pause = accept_backoff(consecutive_errors);
                        logger::log_error(&format!(
                            "Failed to accept connection: {e} (retrying in {pause:?})"
                        ));
                        // Shutdown still wins while backing off
                        tokio::select! {
                            () = tokio::time::sleep(pause) => {}
                            () = &mut shutdown => break,
                        }
                    }
                }
            }

            () = &mut shutdown => {
                log::debug!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_backoff_doubles() {
        assert_eq!(accept_backoff(1), Duration::from_millis(10));
        assert_eq!(accept_backoff(2), Duration::from_millis(20));
        assert_eq!(accept_backoff(4), Duration::from_millis(80));
    }

    #[test]
    fn test_accept_backoff_is_capped() {
        assert_eq!(accept_backoff(8), ACCEPT_BACKOFF_MAX);
        assert_eq!(accept_backoff(u32::MAX), ACCEPT_BACKOFF_MAX);
    }

    #[test]
    fn test_accept_backoff_never_zero() {
        assert!(accept_backoff(0) > Duration::ZERO);
    }
}
