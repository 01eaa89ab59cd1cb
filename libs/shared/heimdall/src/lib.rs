// [libs/shared/heimdall/src/lib.rs]
/*!
 * APARATO: OBSERVABILITY BOOTSTRAP
 * RESPONSABILIDAD: Inicialización de tracing y captura global de panics.
 */

use std::panic;
use tracing::{error, info, instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global `tracing` subscriber for one binary.
///
/// Reads `RUST_LOG`; if unset, defaults to `"{service_name}=debug,tower_http=warn,hyper=warn,libsql=warn"`
/// in debug builds and the same with `info` in release builds. Release builds emit flattened
/// JSON events; debug builds emit compact human-readable output with the target suppressed.
///
/// Also installs a panic hook that logs the panic location and payload through
/// `tracing::error!` under the `panic_monitor` target before the default panic behavior runs,
/// so a panic inside a background pipeline worker is never silently lost.
#[instrument(skip_all)]
pub fn init_tracing(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cfg!(debug_assertions) { "debug" } else { "info" };
        format!("{service_name}={level},tower_http=warn,hyper=warn,libsql=warn").into()
    });

    if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true))
            .init();
    }

    let service = service_name.to_string();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        error!(target: "panic_monitor", service = %service, location = %location, "panic: {payload}");
    }));

    info!(service = %service_name, "tracing initialized");
}
