use std::{fs, path::Path, sync::OnceLock};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub mod formatter;
pub mod writer;

pub use formatter::*;
pub use writer::*;

use crate::configs::LoggingConfig;

pub(crate) static GLOBAL_FILE_WRITER: OnceLock<LineCappedWriter> = OnceLock::new();

#[macro_export]
macro_rules! log_println {
    () => {{
        std::println!();
        $crate::common::logger::append_to_file_raw("\n");
    }};
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        std::println!("{}", msg);
        $crate::common::logger::append_to_file_raw(&format!("{}\n", msg));
    }};
}

/// Mirrors console output printed before or outside of `tracing` into the log file.
pub fn append_to_file_raw(msg: &str) {
    if let Some(mut writer) = GLOBAL_FILE_WRITER.get().cloned() {
        use std::io::Write;
        let _ = writer.write_all(strip_ansi_escapes(msg).as_bytes());
    }
}

/// Builds the `EnvFilter` directive string from the logging section.
pub fn filter_directives(logging: &LoggingConfig) -> String {
    let level = logging.level.as_deref().unwrap_or("info");
    match logging.filters.as_deref() {
        Some(filters) if !filters.is_empty() => format!("{},{}", level, filters),
        _ => level.to_string(),
    }
}

pub fn init(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(logging)));

    let stdout_layer = fmt::layer()
        .event_format(ConsoleFormatter::new(true))
        .with_ansi(true);

    let file_layer = logging.file.as_ref().map(|file_config| {
        if let Some(parent) = Path::new(&file_config.path).parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Failed to create log directory: {}", e);
            }
        }

        let writer = LineCappedWriter::new(file_config.path.clone(), file_config.max_lines);
        let _ = GLOBAL_FILE_WRITER.set(writer.clone());
        fmt::layer()
            .with_writer(writer)
            .event_format(ConsoleFormatter::new(false))
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();
}
