use std::{fmt, fs::OpenOptions, path::Path, sync::Arc};

use chrono::Local;
use tracing::{info, Event, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::Result;

/// MTProto library targets are noisy at info; cap them.
const QUIET_TARGETS: &str = "grammers=warn,grammers_client=warn,grammers_mtsender=warn,grammers_session=warn";

/// `2025-01-31 12:00:00 - jobbot_core::delivery - INFO - message sent`
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} - {} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            meta.target(),
            meta.level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialize logging: stdout at info, append-only `log_file` at debug.
///
/// `RUST_LOG` overrides the console filter only.
pub fn init(service_name: &str, log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_TARGETS}")));
    let file_filter = EnvFilter::new(format!("debug,{QUIET_TARGETS}"));

    let console = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(std::io::stdout)
        .with_filter(console_filter);
    let file = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| crate::Error::External(format!("logging init failed: {e}")))?;

    info!("{}", "=".repeat(50));
    info!("{service_name} logger initialized");
    info!("Timestamp: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(50));

    Ok(())
}
