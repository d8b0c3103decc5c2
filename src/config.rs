//! Configuration module for pressdigest.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

use crate::calendar::{KoreanHolidays, WindowPolicy, DEFAULT_MAX_LOOKBACK_DAYS};
use crate::digest::Labels;
use crate::feed::{default_sources, FeedSource, MAX_FEED_SIZE};
use crate::{DigestError, Result};

/// Environment variable overriding the secrets file path.
pub const SECRETS_PATH_ENV: &str = "PRESSDIGEST_SECRETS_PATH";

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/pressdigest.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Digest window and rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    /// Reference timezone (e.g., "Asia/Seoul").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Cutoff wall-clock time on the window start date, "HH:MM".
    #[serde(default = "default_cutoff_time")]
    pub cutoff_time: String,
    /// Treat weekends as non-business days.
    #[serde(default = "default_skip_weekends")]
    pub skip_weekends: bool,
    /// Maximum days to look back for a business day.
    #[serde(default = "default_max_lookback_days")]
    pub max_lookback_days: u32,
    /// Label language of the rendered document (ko / en).
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Prefix of the published page subject.
    #[serde(default = "default_page_title_prefix")]
    pub page_title_prefix: String,
}

fn default_timezone() -> String {
    "Asia/Seoul".to_string()
}

fn default_cutoff_time() -> String {
    "17:30".to_string()
}

fn default_skip_weekends() -> bool {
    true
}

fn default_max_lookback_days() -> u32 {
    DEFAULT_MAX_LOOKBACK_DAYS
}

fn default_locale() -> String {
    "ko".to_string()
}

fn default_page_title_prefix() -> String {
    "뉴스 업데이트".to_string()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            cutoff_time: default_cutoff_time(),
            skip_weekends: default_skip_weekends(),
            max_lookback_days: default_max_lookback_days(),
            locale: default_locale(),
            page_title_prefix: default_page_title_prefix(),
        }
    }
}

impl DigestConfig {
    /// Parsed reference timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| DigestError::Config(format!("unknown timezone: {}", self.timezone)))
    }

    /// Window policy built from these settings.
    pub fn window_policy(&self) -> Result<WindowPolicy> {
        if self.max_lookback_days == 0 {
            return Err(DigestError::Config(
                "max_lookback_days must be at least 1".to_string(),
            ));
        }
        Ok(WindowPolicy {
            skip_weekends: self.skip_weekends,
            cutoff_time: parse_clock_time("digest.cutoff_time", &self.cutoff_time)?,
            max_lookback_days: self.max_lookback_days,
        })
    }

    /// Render labels for the configured locale.
    pub fn labels(&self) -> Labels {
        Labels::for_locale(&self.locale)
    }
}

/// Holiday calendar configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarConfig {
    /// Movable holidays as "YYYY-MM-DD" strings.
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,
}

impl CalendarConfig {
    /// Holiday calendar with the configured extra dates.
    pub fn holidays(&self) -> KoreanHolidays {
        KoreanHolidays::new().with_extra(self.extra_holidays.iter().copied())
    }
}

/// Feed fetch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size: u64,
    /// User agent sent with feed requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    MAX_FEED_SIZE
}

fn default_user_agent() -> String {
    concat!("pressdigest/", env!("CARGO_PKG_VERSION"), " (RSS Reader)").to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size: default_max_feed_size(),
            user_agent: default_user_agent(),
        }
    }
}

/// Dooray API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DoorayConfig {
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.dooray.com".to_string()
}

impl Default for DoorayConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
        }
    }
}

/// Task settings storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    /// Directory holding `{name}_data.json` files.
    #[serde(default = "default_tasks_dir")]
    pub dir: String,
}

fn default_tasks_dir() -> String {
    "task_list".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            dir: default_tasks_dir(),
        }
    }
}

/// Secrets file configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    /// Path to the TOML secrets file.
    #[serde(default = "default_secrets_path")]
    pub path: String,
}

fn default_secrets_path() -> String {
    "secrets.toml".to_string()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            path: default_secrets_path(),
        }
    }
}

/// Daily schedule configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Local time of the daily run, "HH:MM", in the digest timezone.
    #[serde(default = "default_schedule_time")]
    pub time: String,
}

fn default_schedule_time() -> String {
    "10:30".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            time: default_schedule_time(),
        }
    }
}

impl ScheduleConfig {
    /// Parsed run time.
    pub fn at(&self) -> Result<NaiveTime> {
        parse_clock_time("schedule.time", &self.time)
    }
}

/// Admin web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the web API.
    #[serde(default = "default_web_port")]
    pub port: u16,
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Digest window and rendering.
    #[serde(default)]
    pub digest: DigestConfig,
    /// Holiday calendar.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Feed sources, in fetch order.
    #[serde(default = "default_sources")]
    pub feeds: Vec<FeedSource>,
    /// Feed fetch limits.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Dooray API.
    #[serde(default)]
    pub dooray: DoorayConfig,
    /// Task settings storage.
    #[serde(default)]
    pub tasks: TasksConfig,
    /// Secrets file.
    #[serde(default)]
    pub secrets: SecretsConfig,
    /// Daily schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Admin web API.
    #[serde(default)]
    pub web: WebConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            digest: DigestConfig::default(),
            calendar: CalendarConfig::default(),
            feeds: default_sources(),
            fetch: FetchConfig::default(),
            dooray: DoorayConfig::default(),
            tasks: TasksConfig::default(),
            secrets: SecretsConfig::default(),
            schedule: ScheduleConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DigestError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DigestError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PRESSDIGEST_SECRETS_PATH`: Override the secrets file path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(SECRETS_PATH_ENV) {
            if !path.is_empty() {
                self.secrets.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the timezone or a clock time does not parse, the
    /// lookback limit is zero, or no feed is configured.
    pub fn validate(&self) -> Result<()> {
        self.digest.tz()?;
        self.digest.window_policy()?;
        self.schedule.at()?;
        if self.feeds.is_empty() {
            return Err(DigestError::Config("no feeds configured".to_string()));
        }
        Ok(())
    }
}

fn parse_clock_time(field: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        DigestError::Config(format!("{} must be HH:MM, got '{}'", field, value))
    })
}
