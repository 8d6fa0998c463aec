use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

static LOGGER: Lazy<DreamLogger> = Lazy::new(DreamLogger::new);

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let max_level = config.min_level.to_level_filter();
    LOGGER.update_config(config);

    if let Err(e) = log::set_logger(&*LOGGER) {
        return Err(format!("Failed to set logger: {:?}", e));
    }

    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_target: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file_path: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_target: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file_path: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_file_path = Some(path.to_string());
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_target: true,
            ..Default::default()
        }
    }
}

pub struct DreamLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl DreamLogger {
    fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    fn update_config(&self, new_config: LoggerConfig) {
        if let Some(path) = &new_config.log_file_path {
            if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
                if let Ok(mut log_file) = self.log_file.lock() {
                    *log_file = Some(file);
                }
            }
        }
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
    }

    fn format_line(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        let level = format!("{:<5}", entry.level.as_str());
        let target = if config.show_target {
            format!("{}: ", entry.target)
        } else {
            String::new()
        };

        if config.show_colors {
            format!(
                "{} [{}] {}{}",
                timestamp.bright_black(),
                level.color(entry.level.color()).bold(),
                target.bright_blue(),
                entry.message
            )
        } else {
            format!("{} [{}] {}{}", timestamp, level, target, entry.message)
        }
    }
}

impl log::Log for DreamLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => LogLevel::from_level(metadata.level()) >= config.min_level,
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::from_level(record.level()),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };

        let Ok(config) = self.config.lock() else {
            return;
        };
        let line = self.format_line(&entry, &config);
        if entry.level >= LogLevel::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }

        if config.log_file_path.is_some() {
            let plain = LoggerConfig {
                show_colors: false,
                ..config.clone()
            };
            if let Ok(mut guard) = self.log_file.lock() {
                if let Some(file) = guard.as_mut() {
                    let _ = writeln!(file, "{}", self.format_line(&entry, &plain));
                }
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Ok(mut guard) = self.log_file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long a named operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::debug!(
            "⏱️  '{}' completed in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}
