use log::{LevelFilter, Metadata, Record};
use std::collections::HashMap;
use std::str::FromStr;

/// Writes log records to stderr. Targets can be given their own level;
/// the longest matching target prefix wins.
pub struct Logger {
    level: LevelFilter,
    targets: HashMap<String, LevelFilter>,
}

impl Logger {
    pub fn new(level: &str) -> Result<Logger, String> {
        let level =
            LevelFilter::from_str(level).map_err(|_| format!("invalid log level {}", level))?;
        Ok(Logger {
            level,
            targets: HashMap::new(),
        })
    }

    pub fn enable(logger: Logger) -> Result<(), String> {
        let max_level = logger.max_level();
        log::set_boxed_logger(Box::new(logger))
            .map_err(|_| "cannot initialize logging".to_string())?;
        log::set_max_level(max_level);
        Ok(())
    }

    pub fn add_target(&mut self, target: String, level: String) -> Result<(), String> {
        let level = LevelFilter::from_str(&level)
            .map_err(|_| format!("invalid log level {} for target {}", level, &target))?;
        self.targets.insert(target, level);
        Ok(())
    }

    fn max_level(&self) -> LevelFilter {
        self.targets.values().copied().fold(self.level, std::cmp::max)
    }

    fn level_for(&self, target: &str) -> LevelFilter {
        self.targets
            .iter()
            .filter(|(t, _)| target.starts_with(t.as_str()))
            .max_by_key(|(t, _)| t.len())
            .map_or(self.level, |(_, level)| *level)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{} [{}] - {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
