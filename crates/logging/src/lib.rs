//! helpers for logging.

/// Format a record as `LEVEL message time=... target=...`.
fn format_record(
    buf: &mut env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    use std::io::Write;

    let now = time::OffsetDateTime::now_utc();

    writeln!(
        buf,
        "{} {} time={} target={}",
        record.level(),
        record.args(),
        now,
        record.target()
    )
}

/// Log to stderr, honoring `RUST_LOG` and defaulting to `info`.
///
/// If called multiple times in the same process, only applies once.
pub fn log_to_stderr() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format(format_record)
            .init();
    });
}

/// Like [log_to_stderr], but captured by the test harness and tolerant of another logger already being installed.
pub fn log_for_tests() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(format_record)
        .is_test(true)
        .try_init();
}
