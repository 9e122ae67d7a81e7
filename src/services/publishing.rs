use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{debug, info};

use crate::analysis::ProfileId;
use crate::config::settings::{AppConfig, SiteSettings};
use crate::database::{self, DbConn, DbPool, Profile};
use crate::render::{self, OpponentView, ProfileView, StaticPage};

/// Renders the static site from the database into the dist directory
pub struct PublishingService {
    pool: DbPool,
    dist_dir: PathBuf,
    site: SiteSettings,
    reset_all_data: bool,
}

impl PublishingService {
    pub fn new(config: &AppConfig, pool: DbPool) -> Self {
        Self {
            pool,
            dist_dir: config.storage.dist_dir.clone(),
            site: config.site.clone(),
            reset_all_data: config.reset_all_data,
        }
    }

    pub fn run(&self) -> Result<()> {
        if self.reset_all_data {
            bail!("Skipping build while RESET_ALL_DATA is set");
        }

        info!("=== Starting Site Build ===\n");
        info!("Target directory: {}", self.dist_dir.display());

        let mut conn = database::get_connection(&self.pool)?;
        database::setup::ensure_schema(&mut conn)?;

        self.prepare_dist_dir()?;

        let profiles = database::profiles::list_all(&mut conn)?;
        self.write_site_pages(&profiles)?;
        info!("  → Wrote site pages\n");

        for profile in &profiles {
            self.write_profile(&mut conn, profile, &profiles)?;
        }
        info!("  → Wrote {} profiles\n", profiles.len());

        self.write_timestamp()?;

        info!("=== Build Complete ===");
        Ok(())
    }

    fn prepare_dist_dir(&self) -> Result<()> {
        if self.dist_dir.exists() {
            fs::remove_dir_all(&self.dist_dir)
                .with_context(|| format!("Failed to empty {}", self.dist_dir.display()))?;
        }
        fs::create_dir_all(&self.dist_dir)
            .with_context(|| format!("Failed to create {}", self.dist_dir.display()))
    }

    fn write_site_pages(&self, profiles: &[Profile]) -> Result<()> {
        for page in StaticPage::ALL {
            self.write_file(page.file_name(), &page.render(&self.site))?;
        }
        self.write_file("badges.html", &render::badges_page(&self.site))?;
        self.write_file("index.html", &render::home_page(&self.site, profiles)?)
    }

    fn write_profile(&self, conn: &mut DbConn, profile: &Profile, all: &[Profile]) -> Result<()> {
        let seasons = database::seasons::list_by_profile(conn, profile.profile_id)?;
        let matches = database::matches::list_by_profile(conn, profile.profile_id)?;

        let by_id: HashMap<ProfileId, &Profile> = all.iter().map(|p| (p.profile_id, p)).collect();
        let view = ProfileView::new(profile, &seasons, &matches, |id| {
            by_id.get(&id).copied().map(OpponentView::of)
        });

        let id = profile.profile_id;
        self.write_file(&format!("{}.html", id), &render::profile_page(&self.site, &view)?)?;
        self.write_file(&format!("{}.json", id), &serde_json::to_string_pretty(&view)?)?;

        let lines: Vec<String> = matches
            .iter()
            .map(|row| render::match_text(&row.record))
            .collect();
        self.write_file(&format!("{}.txt", id), &lines.join("\n"))
    }

    fn write_timestamp(&self) -> Result<()> {
        let stamp = serde_json::json!({ "timestamp": Utc::now().to_rfc3339() });
        self.write_file("timestamp.json", &serde_json::to_string(&stamp)?)
    }

    fn write_file(&self, name: &str, content: &str) -> Result<()> {
        let path = self.dist_dir.join(name);
        debug!("Writing file: {}", path.display());
        write_output(&path, content)
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
