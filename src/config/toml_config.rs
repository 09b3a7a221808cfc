use crate::adapters::SmtpSettings;
use crate::core::engine::{RunMode, RunSettings};
use crate::utils::error::{DigestError, Result};
use crate::utils::validation::{self, Validate};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://intranet.joh.cam.ac.uk";
pub const DEFAULT_PATH_PREFIX: &str = "hall-menu-";
pub const DEFAULT_DATE_FORMATS: [&str; 4] = ["%d-%b", "%-d-%b", "%d-%B", "%-d-%B"];
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_STALE_AFTER_DAYS: i64 = 3;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    pub site: SiteConfig,
    pub smtp: SmtpConfig,
    pub schedule: Option<ScheduleConfig>,
    pub files: Option<FilesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    pub path_prefix: Option<String>,
    pub cookie: String,
    pub date_formats: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub email_address: String,
    pub password: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub week_start: Option<String>, // "monday" 或 "sunday"
    pub stale_after_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    pub checkpoint: Option<String>,
    pub users: Option<String>,
    pub log: Option<String>,
}

impl DigestConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DigestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DigestError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HALL_SMTP_PASSWORD})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("regex should be valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn base_url(&self) -> &str {
        self.site.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn path_prefix(&self) -> &str {
        self.site.path_prefix.as_deref().unwrap_or(DEFAULT_PATH_PREFIX)
    }

    pub fn date_formats(&self) -> Vec<String> {
        match &self.site.date_formats {
            Some(formats) => formats.clone(),
            None => DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.site.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn week_start(&self) -> Result<Weekday> {
        let raw = self
            .schedule
            .as_ref()
            .and_then(|s| s.week_start.as_deref())
            .unwrap_or("monday");
        match raw.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Weekday::Mon),
            "sunday" | "sun" => Ok(Weekday::Sun),
            _ => Err(DigestError::InvalidConfigValueError {
                field: "schedule.week_start".to_string(),
                value: raw.to_string(),
                reason: "Must be 'monday' or 'sunday'".to_string(),
            }),
        }
    }

    pub fn stale_after_days(&self) -> i64 {
        self.schedule
            .as_ref()
            .and_then(|s| s.stale_after_days)
            .unwrap_or(DEFAULT_STALE_AFTER_DAYS)
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        self.file_or("./last_week", |f| f.checkpoint.as_deref())
    }

    pub fn users_path(&self) -> PathBuf {
        self.file_or("./users.json", |f| f.users.as_deref())
    }

    pub fn log_path(&self) -> PathBuf {
        self.file_or("./hall_digest.log", |f| f.log.as_deref())
    }

    fn file_or(&self, default: &str, pick: impl Fn(&FilesConfig) -> Option<&str>) -> PathBuf {
        PathBuf::from(self.files.as_ref().and_then(pick).unwrap_or(default))
    }

    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self
                .smtp
                .host
                .clone()
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: self.smtp.port.unwrap_or(DEFAULT_SMTP_PORT),
            email_address: self.smtp.email_address.clone(),
            password: self.smtp.password.clone(),
            timeout: Duration::from_secs(
                self.smtp.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ),
        }
    }

    pub fn run_settings(&self, mode: RunMode, dry_run: bool) -> Result<RunSettings> {
        Ok(RunSettings {
            base_url: self.base_url().to_string(),
            path_prefix: self.path_prefix().to_string(),
            date_formats: self.date_formats(),
            week_start: self.week_start()?,
            stale_after_days: self.stale_after_days(),
            mode,
            dry_run,
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("site.base_url", self.base_url())?;
        validation::validate_resolved("site.cookie", &self.site.cookie)?;

        let formats = self.date_formats();
        if formats.is_empty() {
            return Err(DigestError::InvalidConfigValueError {
                field: "site.date_formats".to_string(),
                value: "[]".to_string(),
                reason: "At least one date format is required".to_string(),
            });
        }
        for format in &formats {
            validation::validate_date_template("site.date_formats", format)?;
        }

        if let Some(timeout) = self.site.timeout_seconds {
            validation::validate_positive_number("site.timeout_seconds", timeout, 1)?;
        }
        if let Some(timeout) = self.smtp.timeout_seconds {
            validation::validate_positive_number("smtp.timeout_seconds", timeout, 1)?;
        }

        validation::validate_resolved("smtp.email_address", &self.smtp.email_address)?;
        validation::validate_resolved("smtp.password", &self.smtp.password)?;

        self.week_start()?;
        if self.stale_after_days() < 0 {
            return Err(DigestError::InvalidConfigValueError {
                field: "schedule.stale_after_days".to_string(),
                value: self.stale_after_days().to_string(),
                reason: "Value cannot be negative".to_string(),
            });
        }

        for (field, path) in [
            ("files.checkpoint", self.checkpoint_path()),
            ("files.users", self.users_path()),
            ("files.log", self.log_path()),
        ] {
            validation::validate_path(field, &path.to_string_lossy())?;
        }

        Ok(())
    }
}

impl Validate for DigestConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
