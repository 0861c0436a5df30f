use {
    anyhow::{Context, Result},
    log::{LevelFilter, Log, Metadata, Record},
    std::{
        fs::{File, OpenOptions, create_dir_all},
        io::Write,
        path::PathBuf,
        str::FromStr,
        sync::Mutex,
        time::{Duration, SystemTime, UNIX_EPOCH},
    },
};

/// Environment variable holding the log level (`error`, `warn`, `info`, `debug`, `trace`, `off`).
pub const LOG_LEVEL_ENV: &str = "CAMLOG";

/// Environment variable naming a directory for date-named log files.
pub const LOG_DIR_ENV: &str = "CAMLOG_DIR";

/// Logging configuration shared by every binary in the workspace.
#[derive(Clone, Debug)]
pub struct LogConfig {
    level: LevelFilter,
    dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

impl LogConfig {
    /// Default configuration, with the level overridden by `CAMLOG` when it parses and
    /// file output enabled by a non-empty `CAMLOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`LogConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup(LOG_LEVEL_ENV) {
            match LevelFilter::from_str(value.trim()) {
                Ok(level) => config = config.with_level(level),
                Err(_) => eprintln!("ignoring invalid {}={:?}", LOG_LEVEL_ENV, value),
            }
        }
        match lookup(LOG_DIR_ENV) {
            Some(dir) if !dir.trim().is_empty() => config.with_dir(dir.trim()),
            _ => config,
        }
    }

    /// Set the maximum level that reaches the logger.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Write date-named log files into `dir` instead of stdout.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn dir(&self) -> Option<&PathBuf> {
        self.dir.as_ref()
    }
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "{} [{}] [{:?}] {}:{} - {}",
        format_timestamp(),
        record.level(),
        std::thread::current().id(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Writes every record to stdout.
pub struct StdoutLogger {
    level: LevelFilter,
}

impl StdoutLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", format_line(record));
        }
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

/// Writes records to `<dir>/<YYYY-MM-DD>.log`, switching files when the UTC date changes.
pub struct FileLogger {
    level: LevelFilter,
    state: Mutex<FileLoggerState>,
}

fn open_day_file(dir: &PathBuf, date: &str) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{}.log", date)))
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>, level: LevelFilter) -> Result<Self> {
        let dir = dir.into();
        create_dir_all(&dir).with_context(|| format!("creating log directory {:?}", dir))?;
        let current_date = format_today();
        let file = open_day_file(&dir, &current_date)
            .with_context(|| format!("opening log file in {:?}", dir))?;
        Ok(Self {
            level,
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let today = format_today();
        if today != state.current_date {
            match open_day_file(&state.dir, &today) {
                Ok(file) => {
                    state.file = file;
                    state.current_date = today;
                }
                // keep writing to yesterday's file
                Err(error) => eprintln!("failed to roll log file in {:?}: {}", state.dir, error),
            }
        }
        let line = format_line(record);
        if let Err(error) = writeln!(state.file, "{}", line) {
            eprintln!("failed to write log file: {}", error);
            eprintln!("{}", line);
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

/// Install the global logger described by `config`.
///
/// Only the first call in a process installs a logger; later calls return `Ok(())`
/// without replacing it.
pub fn init_logger(config: &LogConfig) -> Result<()> {
    let logger: Box<dyn Log> = match config.dir() {
        Some(dir) => Box::new(FileLogger::new(dir.clone(), config.level())?),
        None => Box::new(StdoutLogger::new(config.level())),
    };
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(config.level());
    }
    Ok(())
}

/// Install a stdout logger configured from the environment.
pub fn init_stdout_logger() {
    let config = LogConfig::from_env();
    if log::set_boxed_logger(Box::new(StdoutLogger::new(config.level()))).is_ok() {
        log::set_max_level(config.level());
    }
}

fn since_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmm`.
pub fn format_timestamp() -> String {
    let now = since_epoch();
    let secs = now.as_secs();
    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    let time_of_day = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60,
        now.subsec_millis()
    )
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn format_today() -> String {
    let (year, month, day) = civil_from_days((since_epoch().as_secs() / 86400) as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

// days since 1970-01-01 to (year, month, day), Howard Hinnant's algorithm
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn test_civil_from_days_leap_day() {
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
    }

    #[test]
    fn test_civil_from_days_year_end() {
        assert_eq!(civil_from_days(20088), (2024, 12, 31));
    }

    #[test]
    fn test_timestamp_layout() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 23);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
    }

    #[test]
    fn test_file_logger_rolls_to_new_day() {
        let dir = std::env::temp_dir().join(format!("base-log-{}-rollover", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let logger = FileLogger::new(&dir, LevelFilter::Info).unwrap();
        {
            let mut state = logger.state.lock().unwrap();
            state.current_date = "1999-01-01".to_string();
            state.file = open_day_file(&dir, "1999-01-01").unwrap();
        }

        logger.log(
            &log::RecordBuilder::new()
                .level(log::Level::Info)
                .file(Some("test.rs"))
                .line(Some(1))
                .args(format_args!("after rollover"))
                .build(),
        );
        logger.flush();

        let today = dir.join(format!("{}.log", format_today()));
        let content = std::fs::read_to_string(&today).unwrap();
        assert!(content.contains("after rollover"));
        assert!(dir.join("1999-01-01.log").exists());
        assert_eq!(logger.state.lock().unwrap().current_date, format_today());

        std::fs::remove_dir_all(&dir).ok();
    }
}
