//! A thin, opt-in `log4rs` initializer for binaries and tests that want formatted
//! output on stdout. The library itself never calls this — a library must not
//! assume ownership of the process-wide logger; only a `main` or a test harness
//! should.

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

const CONSOLE_APPENDER: &str = "stdout";
const LINE_PATTERN: &str = "{d(%H:%M:%S.%3f)} [{l}] {m}{n}";

/// Installs a console-only `log4rs` logger at `level`. Intended for `main`
/// functions and integration tests that want to see `log::debug!`/`log::info!`
/// output from the handler and the tree; unit tests rarely need it.
pub fn init_console_logger(level: LevelFilter) {
    let appender = ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(LINE_PATTERN))).build();
    let config = Config::builder()
        .appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(appender)))
        .build(Root::builder().appender(CONSOLE_APPENDER).build(level))
        .expect("static appender/root configuration is always valid");
    // Ignore the error: a second call (e.g. from multiple test binaries sharing a
    // process) would otherwise panic on an already-installed global logger.
    let _ = log4rs::init_config(config);
}
