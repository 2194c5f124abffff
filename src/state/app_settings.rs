use log::LevelFilter;
use pickem_api::client::{DEFAULT_FALLBACK_TO, DEFAULT_WEEK_SOURCE};

#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Week document URL or local file path.
    pub week_source: String,
    /// Submission endpoint. None means the mail fallback is the only channel.
    pub submit_url: Option<String>,
    /// Fallback mail recipient for the compose link.
    pub fallback_to: String,
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            week_source: DEFAULT_WEEK_SOURCE.to_owned(),
            submit_url: None,
            fallback_to: DEFAULT_FALLBACK_TO.to_owned(),
            full_screen: false,
            log_level: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self {
            week_source: env_or("PICKSHEET_WEEK_URL", DEFAULT_WEEK_SOURCE),
            submit_url: non_empty_env("PICKSHEET_SUBMIT_URL"),
            fallback_to: env_or("PICKSHEET_FALLBACK_TO", DEFAULT_FALLBACK_TO),
            full_screen: false,
            log_level: None,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    non_empty_env(key).unwrap_or_else(|| default.to_owned())
}
