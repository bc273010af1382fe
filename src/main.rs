use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use cors_file_server::cli::Args;
use cors_file_server::config::{AppState, Config};
use cors_file_server::{logger, server, Result};

/// How long in-flight connections get once the accept loop has stopped
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage errors share the invalid-port exit status
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Validate the port before anything else touches the network
    let port = args.port()?;
    let cfg = Config::load(port)?;
    logger::init(&cfg.logging);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.performance.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let result = runtime.block_on(async_main(cfg));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn async_main(cfg: Config) -> Result<()> {
    let addr = cfg.get_socket_addr()?;
    let root = cfg.resolve_root()?;

    let listener = server::create_listener(addr)?;
    let local_addr = listener.local_addr()?;
    let state = Arc::new(AppState::new(&cfg, root));

    logger::log_server_start(&local_addr, &state.root);
    log::info!(
        "Worker threads: {}",
        cfg.performance
            .workers
            .map_or_else(|| "CPU cores".to_string(), |w| w.to_string())
    );

    server::run_server(listener, state, server::shutdown_signal()).await;

    logger::log_shutdown();
    Ok(())
}
