use std::sync::Once;

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;
static INIT: Once = Once::new();

/// Install the stderr logger; later calls only adjust the level
pub fn init_logger(level: log::LevelFilter) {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
    });
    log::set_max_level(level);
}

/// Map repeated `-v` flags to a log level
pub fn level_for_verbosity(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), log::LevelFilter::Warn);
        assert_eq!(level_for_verbosity(2), log::LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), log::LevelFilter::Trace);
    }
}
