//! Diagnostic channel for failures inside the logger itself
//!
//! The rotating file logger cannot report its own I/O failures into the file
//! that just failed, so it emits them as `tracing` events instead. This module
//! installs a subscriber that prints those events to a terminal stream.
//!
//! ## Output Destination
//!
//! - **stderr (default)**: keeps diagnostics apart from entries echoed to stdout
//!   and from any machine-readable output a CLI prints there.
//! - **stdout**: on request, for environments that only capture one stream.
//!
//! ## Filtering
//!
//! `RUST_LOG` is honoured when set; otherwise the given default level applies.
//! Field styling is only emitted when the chosen stream is a terminal, so a
//! redirected stderr file stays plain text.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trion::init_diagnostics;
//!
//! init_diagnostics(Some("warn"), None);
//! ```

use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Formatter that adds target and file:line only for ERROR and WARN events
pub struct DiagnosticFormatter;

impl<S, N> FormatEvent<S, N> for DiagnosticFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = metadata.level();

        write!(&mut writer, "{}", level)?;
        if matches!(level, &Level::ERROR | &Level::WARN) {
            write!(&mut writer, " {}", metadata.target())?;
            if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
                write!(&mut writer, " {}:{}", file, line)?;
            }
        }
        write!(&mut writer, ": ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Env filter from `RUST_LOG`, or `default_level` when unset or invalid
pub fn create_env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the diagnostic subscriber
///
/// # Arguments
/// * `default_level` - Level used when `RUST_LOG` is unset. Defaults to "warn".
/// * `output` - "stdout" or "stderr". Defaults to stderr.
///
/// Returns false if a global subscriber was already installed.
pub fn init_diagnostics(default_level: Option<&str>, output: Option<&str>) -> bool {
    let env_filter = create_env_filter(default_level.unwrap_or("warn"));

    match output {
        Some("stdout") => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(std::io::stdout().is_terminal())
                .event_format(DiagnosticFormatter))
            .try_init()
            .is_ok(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .event_format(DiagnosticFormatter))
            .try_init()
            .is_ok(),
    }
}
