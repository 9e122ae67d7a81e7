use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use log::{error, info, warn};

use crate::analysis::{
    classify_or_tag, extract_match_statistics, Match, MatchId, MatchState, MatchStatistics,
    ProfileId,
};
use crate::api::axescores_client::{parse_match_payload, AxeScoresClient, PayloadSource};
use crate::cache::Cache;
use crate::config::profiles::is_tracked;
use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, DbPool, ProfileInfo, SeasonInfo};
use crate::domain::{FetchProgress, MatchResponse, PlayerResponse, StandingResponse};

/// Scrapes standings, profiles and matches into the database
pub struct IngestionService {
    cache: Cache,
    api_client: AxeScoresClient,
    pool: DbPool,
    ruleset: String,
    tracked_profile_ids: Vec<ProfileId>,
    reprocess_match_ids: Vec<MatchId>,
    reset_all_data: bool,
}

impl IngestionService {
    pub fn new(config: &AppConfig, pool: DbPool) -> Result<Self> {
        Ok(Self {
            cache: Cache::new(&config.storage.cache_dir)?,
            api_client: AxeScoresClient::new(&config.scraper)?,
            pool,
            ruleset: config.scraper.ruleset.to_string(),
            tracked_profile_ids: config.tracked_profile_ids.clone(),
            reprocess_match_ids: config.reprocess_match_ids.clone(),
            reset_all_data: config.reset_all_data,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("=== Starting Data Ingestion ===\n");

        let mut conn = database::get_connection(&self.pool)?;
        self.prepare_database(&mut conn)?;

        // Step 1: Discover profiles
        let standings = self.discover_profiles().await?;
        info!("  → Found {} tracked active profiles\n", standings.len());

        // Step 2: Profiles, seasons and played matches
        let scraped = self.scrape_profiles(&mut conn, &standings).await;
        info!("  → Scraped {}/{} profiles\n", scraped, standings.len());

        // Step 3: Fetch and classify pending matches
        let processed = self.process_pending_matches(&mut conn).await?;
        info!("  → Classified {} match rows\n", processed);

        for (state, count) in database::matches::count_by_state(&mut conn)? {
            info!("  {:?}: {}", state, count);
        }

        info!("=== Ingestion Complete ===");
        Ok(())
    }

    fn prepare_database(&self, conn: &mut DbConn) -> Result<()> {
        if self.reset_all_data {
            warn!("Resetting all data before scraping");
            database::setup::reset_database(conn)?;
            self.cache.clear()?;
        } else {
            database::setup::ensure_schema(conn)?;
        }
        Ok(())
    }

    async fn discover_profiles(&mut self) -> Result<Vec<StandingResponse>> {
        info!("Step 1: Discovering profiles from career standings...");

        let standings = self.api_client.fetch_standings().await?;
        self.cache.save_parsed("standings", &standings)?;

        Ok(select_profiles(standings, &self.tracked_profile_ids))
    }

    async fn scrape_profiles(
        &mut self,
        conn: &mut DbConn,
        standings: &[StandingResponse],
    ) -> usize {
        info!("Step 2: Scraping profiles...");

        let mut scraped = 0;
        for standing in standings {
            match self.scrape_profile(conn, standing).await {
                Ok(()) => scraped += 1,
                Err(e) => error!("Failed to scrape profile {}: {:?}", standing.id, e),
            }
        }
        scraped
    }

    async fn scrape_profile(
        &mut self,
        conn: &mut DbConn,
        standing: &StandingResponse,
    ) -> Result<()> {
        info!("Scraping profile data for profile ID {}", standing.id);

        let player = self.api_client.fetch_player(standing.id).await?;
        let image = self.api_client.image_url(standing.id);
        let inserted = record_profile(conn, standing, &player, &image, &self.ruleset)?;

        if inserted > 0 {
            info!("  → {} new matches for profile {}", inserted, standing.id);
        }
        Ok(())
    }

    async fn process_pending_matches(&mut self, conn: &mut DbConn) -> Result<usize> {
        info!("Step 3: Fetching match details...");

        let pending = database::matches::list_pending(conn, &self.reprocess_match_ids)?;
        let by_match = group_by_match(&pending);
        let reprocess: HashSet<MatchId> = self.reprocess_match_ids.iter().copied().collect();

        let mut progress = FetchProgress::new(by_match.len());
        let mut processed = 0;

        for (match_id, profile_ids) in by_match {
            let refresh = reprocess.contains(&match_id);
            match self
                .api_client
                .fetch_and_cache_match(match_id, &self.cache, refresh)
                .await
            {
                Ok((payload, source)) => {
                    processed += match parse_match_payload(match_id, payload) {
                        Ok(raw) => record_match(conn, &raw, &profile_ids)?,
                        Err(e) => {
                            warn!("Unreadable payload for match {}: {:?}", match_id, e);
                            record_invalid_match(conn, match_id, &profile_ids)?
                        }
                    };
                    match source {
                        PayloadSource::Fetched => progress.increment_fetched(),
                        PayloadSource::Cached => progress.increment_cached(),
                    }
                }
                Err(e) => {
                    error!("Failed to fetch match {}: {:?}", match_id, e);
                    progress.increment_failed();
                }
            }
        }

        if progress.failed() > 0 {
            warn!("  → {} matches could not be fetched and stay pending", progress.failed());
        }
        Ok(processed)
    }
}

/// Active standings entries that are tracked
pub fn select_profiles(
    standings: Vec<StandingResponse>,
    tracked: &[ProfileId],
) -> Vec<StandingResponse> {
    standings
        .into_iter()
        .filter(|s| s.active && is_tracked(tracked, s.id))
        .collect()
}

/// Upserts a profile with its ruleset seasons and queues every played match.
/// Returns how many match rows were new.
pub fn record_profile(
    conn: &mut DbConn,
    standing: &StandingResponse,
    player: &PlayerResponse,
    image: &str,
    ruleset: &str,
) -> Result<usize> {
    let profile_id = standing.id;
    database::profiles::upsert_profile(
        conn,
        &ProfileInfo {
            profile_id,
            name: player.name.clone(),
            about: player.about.clone().unwrap_or_default(),
            rank: standing.rank,
            rating: standing.rating,
            image: image.to_string(),
        },
    )?;

    let mut inserted = 0;
    for league in player.seasons_for(ruleset) {
        database::seasons::upsert_season(
            conn,
            &SeasonInfo {
                profile_id,
                season_id: league.id,
                name: league.name.clone(),
                short_name: league.short_name.clone(),
                date: league.date.clone(),
                season_rank: league.season_rank.unwrap_or(0),
                playoff_rank: league.playoff_rank.unwrap_or(0),
            },
        )?;

        for (week, match_id) in league.played_matches() {
            if database::matches::insert_if_missing(conn, match_id, profile_id, league.id, week)? {
                inserted += 1;
            }
        }
    }
    Ok(inserted)
}

/// Classifies a raw match for each tracked participant with a row and
/// overwrites those rows. Returns how many rows were written.
pub fn record_match(
    conn: &mut DbConn,
    raw: &MatchResponse,
    profile_ids: &[ProfileId],
) -> Result<usize> {
    let mut written = 0;

    for &profile_id in profile_ids {
        info!("Processing match details for match ID {} profile ID {}", raw.id, profile_id);

        let (record, problem) = classify_or_tag(raw, profile_id);
        if let Some(e) = problem {
            warn!("  → {}", e);
        }

        let stats = extract_match_statistics(&record.rounds);
        database::matches::update_classification(conn, &record, &stats)?;
        written += 1;
    }
    Ok(written)
}

/// Tags every pending row of a match whose payload cannot be read as Invalid,
/// so it is not retried on the next scrape. Returns how many rows were written.
pub fn record_invalid_match(
    conn: &mut DbConn,
    match_id: MatchId,
    profile_ids: &[ProfileId],
) -> Result<usize> {
    for &profile_id in profile_ids {
        let record = Match::tagged(match_id, profile_id, 0, MatchState::Invalid);
        database::matches::update_classification(conn, &record, &MatchStatistics::default())?;
    }
    Ok(profile_ids.len())
}

fn group_by_match(pending: &[database::PendingMatch]) -> BTreeMap<MatchId, Vec<ProfileId>> {
    let mut grouped: BTreeMap<MatchId, Vec<ProfileId>> = BTreeMap::new();
    for p in pending {
        grouped.entry(p.match_id).or_default().push(p.profile_id);
    }
    grouped
}
