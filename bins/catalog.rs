use std::process::ExitCode;

use common::utils::logging::{init_logging, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // .env first so RUST_LOG and LOG_FORMAT apply
    dotenv().ok();
    init_logging(LogFormat::from_env());
    info!(service = "catalog", event = "logger_init", "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "catalog",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let cfg = match configs::AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "catalog", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    let worker_threads = cfg.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "catalog", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "catalog",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "catalog service starting"
    );

    // server::run owns signal handling and drains in-flight requests itself
    rt.block_on(async move {
        match tokio::spawn(server::run(cfg)).await {
            Ok(Ok(())) => {
                info!(service = "catalog", event = "stop", %service_id, pid, "catalog stopped normally");
                ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                error!(service = "catalog", event = "run_failed", error = %e, "server::run returned error");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!(service = "catalog", event = "task_join_error", error = %e, "server task join error");
                ExitCode::FAILURE
            }
        }
    })
}
