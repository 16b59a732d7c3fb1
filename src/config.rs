use anyhow::{anyhow, Context, Result};
use chrono::Weekday;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::calendar::parse_weekday;

const DEFAULT_REFRESH_SECONDS: u64 = 60;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Built-in theme used when no `theme.toml` sits next to the config.
    pub theme:    Option<String>,
    pub calendar: Option<CalendarConfig>,
    pub refresh:  Option<RefreshConfig>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarConfig {
    pub week_start: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshConfig {
    pub interval_seconds: Option<u64>,
}

impl AppConfig {
    /// Loads `config.toml` from `dir`, or defaults when the file is absent.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_file(&dir.join("config.toml"))
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn week_start(&self) -> Result<Weekday> {
        match self.calendar.as_ref().and_then(|c| c.week_start.as_deref()) {
            None => Ok(Weekday::Mon),
            Some(name) => parse_weekday(name)
                .ok_or_else(|| anyhow!("calendar.week_start: unknown weekday {name:?}")),
        }
    }

    pub fn refresh_seconds(&self) -> u64 {
        self.refresh.as_ref()
            .and_then(|r| r.interval_seconds)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_REFRESH_SECONDS)
    }

    pub fn theme_name(&self) -> &str {
        self.theme.as_deref().unwrap_or("default")
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("choreboard")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("choreboard")
}
