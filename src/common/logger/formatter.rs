use core::fmt as core_fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields},
    },
    registry::LookupSpan,
};

/// Single-line event format: `[time] LEVEL target:line > message`.
pub struct ConsoleFormatter {
    use_ansi: bool,
}

impl ConsoleFormatter {
    pub fn new(use_ansi: bool) -> Self {
        Self { use_ansi }
    }

    fn level_color(level: &Level) -> &'static str {
        match *level {
            Level::ERROR => "\x1b[31m",
            Level::WARN => "\x1b[33m",
            Level::INFO => "\x1b[32m",
            Level::DEBUG => "\x1b[34m",
            Level::TRACE => "\x1b[35m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> core_fmt::Result {
        let (reset, bold, dim) = if self.use_ansi {
            ("\x1b[0m", "\x1b[1m", "\x1b[2m")
        } else {
            ("", "", "")
        };

        let format = time::macros::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        );
        let timestamp = time::OffsetDateTime::now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
            .format(&format)
            .unwrap_or_else(|_| "Unknown Time".to_string());
        write!(writer, "{}[{}]{} ", dim, timestamp, reset)?;

        let metadata = event.metadata();
        let level = metadata.level();
        if self.use_ansi {
            write!(
                writer,
                "{}{}{: <5}{} ",
                Self::level_color(level),
                bold,
                level.as_str(),
                reset
            )?;
        } else {
            write!(writer, "{: <5} ", level.as_str())?;
        }

        let line = metadata
            .line()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "??".to_string());
        write!(writer, "{}{}:{}{} > ", dim, metadata.target(), line, reset)?;

        // Current span chain, outermost first, e.g. `track{id=..}:`
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}{}{}: ", bold, span.name(), reset)?;
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer, "{}", reset)
    }
}
