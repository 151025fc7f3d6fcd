//! Process entry shared by the service binaries.

use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

use crate::startup::{self, ServiceKind};

fn init_logging(service: &'static str) {
    // .env first so RUST_LOG / LOG_FORMAT apply
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service, event = "logger_init", "tracing subscriber initialized");
}

/// Run `kind` to completion: logging, config, runtime, signal handling.
pub fn launch(kind: ServiceKind) -> ExitCode {
    let service = kind.name();
    init_logging(service);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let cfg = match AppConfig::load_for_service(kind.default_port()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service, event = "config_invalid", error = %e, "configuration rejected");
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
            error!(service, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service,
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "service starting"
    );

    rt.block_on(async move {
        let shutdown = CancellationToken::new();
        common::shutdown::cancel_on_signal(shutdown.clone());

        match startup::run(kind, cfg, shutdown.clone()).await {
            Ok(()) => {
                let reason = if shutdown.is_cancelled() { "signal" } else { "server_exit" };
                info!(service, event = "stop", %service_id, pid, reason, "service stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service, event = "run_failed", %service_id, error = %e, "service exited with error");
                ExitCode::FAILURE
            }
        }
    })
}
