use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with the project-standard report hook.
///
/// Call this first thing in `main()`. Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware output and span trace capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events, default
///   level `info`.
/// - **Development** (default): pretty, human-readable events, default level
///   `debug` for the workspace crates and `info` for the driver.
///
/// `RUST_LOG` overrides the default filter in both modes. The
/// `tracing_error::ErrorLayer` is always installed so eyre reports carry the
/// span trace of the failing provisioning step.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(environment: &Environment) {
    let json = environment.json_logs();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if json {
            EnvFilter::new("info,mongodb=warn")
        } else {
            EnvFilter::new("info,domain_catalog=debug,database=debug,catalog_provisioner=debug")
        }
    });

    let result = if json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
