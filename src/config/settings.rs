use std::path::PathBuf;

use super::profiles::{get_profile_ids, parse_id_list};
use crate::analysis::{MatchId, ProfileId};

#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub api_base_url: &'static str,
    pub image_base_url: &'static str,
    pub ruleset: &'static str,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 500, // 2 req/sec
            user_agent: "AxeCharts/1.0",
            timeout_secs: 30,
            api_base_url: "https://api.axescores.com",
            image_base_url: "https://admin.axescores.com/pic",
            ruleset: "IATF Premier",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
    pub cache_dir: PathBuf,
    pub dist_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: "axe_charts.db".to_string(),
            cache_dir: PathBuf::from("cache"),
            dist_dir: PathBuf::from("dist"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub base_url: String,
    pub title: &'static str,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://axecharts.com".to_string(),
            title: "Axe Charts",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scraper: ScraperSettings,
    pub storage: StorageSettings,
    pub site: SiteSettings,
    pub tracked_profile_ids: Vec<ProfileId>,
    /// Drop every table before scraping; page builds refuse to run
    pub reset_all_data: bool,
    /// Matches to fetch and classify again even when already processed
    pub reprocess_match_ids: Vec<MatchId>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            scraper: ScraperSettings::default(),
            storage: StorageSettings::default(),
            site: SiteSettings::default(),
            tracked_profile_ids: get_profile_ids(),
            reset_all_data: false,
            reprocess_match_ids: Vec::new(),
        }
    }

    /// Defaults overridden by `DATABASE_PATH`, `CACHE_DIR`, `DIST_DIR`,
    /// `SITE_URL`, `RESET_ALL_DATA` and `REPROCESS_MATCH_IDS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.storage.database_path = path;
        }
        if let Some(dir) = lookup("CACHE_DIR") {
            config.storage.cache_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("DIST_DIR") {
            config.storage.dist_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("SITE_URL") {
            config.site.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(flag) = lookup("RESET_ALL_DATA") {
            config.reset_all_data = is_truthy(&flag);
        }
        if let Some(ids) = lookup("REPROCESS_MATCH_IDS") {
            config.reprocess_match_ids = parse_id_list(&ids);
        }

        config
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
