//! src/telemetry.rs
use tracing_subscriber::prelude::*;

pub fn init_tracing(service_name: &'static str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(false),
        )
        .try_init()?;

    tracing::debug!("telemetry initialized for {service_name}");
    Ok(())
}
