use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for a leadscout process.
///
/// Every field has a default; see [`crate::load_app_config`] for the env
/// var names.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub max_results: usize,
    /// Consecutive scroll rounds without new listings before the feed is
    /// considered exhausted.
    pub stagnation_rounds: u32,
    pub scroll_delay_min_ms: u64,
    pub scroll_delay_max_ms: u64,
    pub enrich_delay_min_ms: u64,
    pub enrich_delay_max_ms: u64,
    /// Pause after opening a listing's detail view.
    pub detail_settle_ms: u64,
    pub enrich_timeout_secs: u64,
    pub user_agent: String,
    /// Optional YAML file overriding the built-in extraction rules.
    pub rules_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl AppConfig {
    #[must_use]
    pub fn enrich_timeout(&self) -> Duration {
        Duration::from_secs(self.enrich_timeout_secs)
    }
}
