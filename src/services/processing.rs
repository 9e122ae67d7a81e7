use anyhow::{Context, Result};
use log::{error, info};

use crate::analysis::{
    aggregate, earned_badges, extract_match_statistics, AggregateStatistics, BadgeContext,
    EarnedBadge, Match, MatchState, MatchSummary, ProfileId, SeasonView,
};
use crate::database::{self, DbConn, DbPool, MatchRow, Season};

/// Recomputes every statistic and badge from the stored rounds
pub struct ProcessingService {
    pool: DbPool,
}

/// What one profile's analysis produced
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileAnalysis {
    pub profile_id: ProfileId,
    pub career: AggregateStatistics,
    pub seasons: Vec<(i64, AggregateStatistics)>,
    pub badges: Vec<EarnedBadge>,
}

impl ProcessingService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn run(&self) -> Result<()> {
        info!("=== Starting Profile Analysis ===\n");

        let mut conn = database::get_connection(&self.pool)?;
        database::setup::ensure_schema(&mut conn)?;

        let profile_ids = database::profiles::list_ids(&mut conn)?;
        info!("  → Analyzing {} profiles\n", profile_ids.len());

        let mut analyzed = 0;
        for profile_id in &profile_ids {
            match in_transaction(&mut conn, |conn| analyze_profile(conn, *profile_id)) {
                Ok(analysis) => {
                    analyzed += 1;
                    info!(
                        "  → Profile {}: {} matches, ACR {}, {} badges",
                        profile_id,
                        analysis.career.matches.count,
                        analysis.career.acr.rating,
                        analysis.badges.len()
                    );
                }
                Err(e) => error!("Failed to analyze profile {}: {:?}", profile_id, e),
            }
        }

        info!("  → Analyzed {}/{} profiles\n", analyzed, profile_ids.len());
        info!("=== Analysis Complete ===");
        Ok(())
    }
}

/// Recomputes and overwrites one profile's match, season and career
/// statistics plus its badges
pub fn analyze_profile(conn: &mut DbConn, profile_id: ProfileId) -> Result<ProfileAnalysis> {
    let rows = database::matches::list_by_profile(conn, profile_id)?;
    let seasons = database::seasons::list_by_profile(conn, profile_id)?;

    let valid = refresh_match_stats(conn, &rows)?;

    let season_stats: Vec<(i64, AggregateStatistics)> = seasons
        .iter()
        .map(|s| (s.season_id, aggregate_season(&valid, s)))
        .collect();
    for (season_id, stats) in &season_stats {
        database::seasons::update_stats(conn, profile_id, *season_id, stats)?;
    }

    let career = aggregate(valid.iter().map(|(_, summary)| summary));

    let matches: Vec<Match> = valid.iter().map(|(row, _)| row.record.clone()).collect();
    let ctx = BadgeContext {
        matches: &matches,
        seasons: seasons
            .iter()
            .zip(&season_stats)
            .map(|(season, (_, stats))| SeasonView {
                season_rank: season.season_rank,
                playoff_rank: season.playoff_rank,
                stats,
            })
            .collect(),
        career: &career,
    };
    let badges = earned_badges(&ctx);

    database::profiles::update_analysis(conn, profile_id, &career, &badges)?;

    Ok(ProfileAnalysis {
        profile_id,
        career,
        seasons: season_stats,
        badges,
    })
}

/// Rewrites each valid match's statistics and returns it with its summary
fn refresh_match_stats<'a>(
    conn: &mut DbConn,
    rows: &'a [MatchRow],
) -> Result<Vec<(&'a MatchRow, MatchSummary)>> {
    let mut valid = Vec::new();

    for row in rows.iter().filter(|r| r.record.state == MatchState::Valid) {
        let stats = extract_match_statistics(&row.record.rounds);
        if stats != row.stats {
            database::matches::update_stats(conn, row.match_id(), row.record.profile_id, &stats)?;
        }
        if let Some(summary) = row.record.summary() {
            valid.push((row, summary));
        }
    }
    Ok(valid)
}

fn aggregate_season(valid: &[(&MatchRow, MatchSummary)], season: &Season) -> AggregateStatistics {
    aggregate(
        valid
            .iter()
            .filter(|(row, _)| row.season_id == season.season_id)
            .map(|(_, summary)| summary),
    )
}

/// Runs `work` inside BEGIN/COMMIT, rolling back on error
fn in_transaction<T>(
    conn: &mut DbConn,
    work: impl FnOnce(&mut DbConn) -> Result<T>,
) -> Result<T> {
    conn.execute_batch("BEGIN IMMEDIATE")
        .context("Failed to begin transaction")?;
    match work(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")
                .context("Failed to commit transaction")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                error!("Rollback failed: {:?}", rollback);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::round;
    use crate::analysis::{Category, MatchOutcome, MatchStatistics, Throw};
    use crate::database::{create_memory_pool, get_connection, ProfileInfo, SeasonInfo};

    fn setup() -> DbPool {
        let pool = create_memory_pool().unwrap();
        database::setup::ensure_schema(&mut get_connection(&pool).unwrap()).unwrap();
        pool
    }

    fn store(conn: &mut DbConn, season_id: i64, record: Match) {
        database::matches::insert_if_missing(conn, record.match_id, record.profile_id, season_id, 1)
            .unwrap();
        // stale statistics, analysis must recompute them
        database::matches::update_classification(conn, &record, &MatchStatistics::default())
            .unwrap();
    }

    fn valid(match_id: i64, outcome: MatchOutcome, rounds: Vec<crate::analysis::Round>) -> Match {
        let total = rounds.iter().filter(|r| !r.is_big_axe()).map(|r| r.total).sum();
        Match {
            match_id,
            profile_id: 1,
            opponent_id: 2,
            state: MatchState::Valid,
            outcome: Some(outcome),
            total,
            rounds,
        }
    }

    fn seed(conn: &mut DbConn) {
        database::profiles::upsert_profile(
            conn,
            &ProfileInfo {
                profile_id: 1,
                name: "Jane".to_string(),
                about: String::new(),
                rank: 1,
                rating: 1500,
                image: String::new(),
            },
        )
        .unwrap();
        for (season_id, season_rank) in [(10, 1), (20, 5)] {
            database::seasons::upsert_season(
                conn,
                &SeasonInfo {
                    profile_id: 1,
                    season_id,
                    name: format!("Season {}", season_id),
                    short_name: String::new(),
                    date: String::new(),
                    season_rank,
                    playoff_rank: 0,
                },
            )
            .unwrap();
        }

        let mut clutch = round(Category::Hatchet, &[5, 5, 5, 5], 10);
        clutch.throws.push(Throw::clutch(7));
        clutch.total = 27;

        store(
            conn,
            10,
            valid(
                100,
                MatchOutcome::Win,
                vec![
                    round(Category::Hatchet, &[5, 5, 5, 5, 5], 10),
                    clutch,
                    round(Category::Hatchet, &[3, 3, 3, 3, 3], 20),
                ],
            ),
        );
        store(
            conn,
            20,
            valid(
                200,
                MatchOutcome::Loss,
                vec![
                    round(Category::Hatchet, &[1, 1, 1, 1, 1], 10),
                    round(Category::Hatchet, &[3, 3, 3, 3, 3], 20),
                    round(Category::Hatchet, &[5, 5, 5, 5, 5], 10),
                ],
            ),
        );
        store(conn, 20, Match::tagged(300, 1, 2, MatchState::Forfeit));
        store(conn, 20, Match::tagged(400, 1, 2, MatchState::Unresolved));
    }

    #[test]
    fn test_analyze_profile_aggregates_valid_matches_only() {
        let pool = setup();
        let mut conn = get_connection(&pool).unwrap();
        seed(&mut conn);

        let analysis = analyze_profile(&mut conn, 1).unwrap();

        assert_eq!(analysis.career.matches.count, 2);
        assert_eq!(analysis.career.matches.win, 1);
        assert_eq!(analysis.career.matches.total_score, 67 + 45);
        assert_eq!(analysis.seasons.len(), 2);
        assert_eq!(analysis.seasons[0].1.matches.count, 1);
        assert_eq!(analysis.seasons[1].1.matches.loss, 1);

        let titles: Vec<&str> = analysis.badges.iter().map(|b| b.title.as_str()).collect();
        assert!(titles.contains(&"Natural Round"));
        assert!(titles.contains(&"Supernatural Round"));
        assert!(titles.contains(&"Top Performer"));
    }

    #[test]
    fn test_analysis_is_persisted_and_repeatable() {
        let pool = setup();
        let mut conn = get_connection(&pool).unwrap();
        seed(&mut conn);

        let first = analyze_profile(&mut conn, 1).unwrap();
        let second = analyze_profile(&mut conn, 1).unwrap();
        assert_eq!(first, second);

        let profile = database::profiles::find_by_id(&mut conn, 1).unwrap().unwrap();
        assert_eq!(profile.stats, first.career);
        assert_eq!(profile.badges, first.badges);

        let rows = database::matches::list_by_profile(&mut conn, 1).unwrap();
        let refreshed = rows.iter().find(|r| r.match_id() == 100).unwrap();
        assert_eq!(refreshed.stats.hatchet.round_count, 3);
        assert_eq!(refreshed.stats.hatchet.clutch.hit, 1);

        let seasons = database::seasons::list_by_profile(&mut conn, 1).unwrap();
        assert_eq!(seasons[1].stats, first.seasons[1].1);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let pool = setup();
        let mut conn = get_connection(&pool).unwrap();

        let result: Result<()> = in_transaction(&mut conn, |conn| {
            conn.execute("INSERT INTO profiles (profileId) VALUES (9)", [])?;
            anyhow::bail!("boom")
        });

        assert!(result.is_err());
        assert!(database::profiles::find_by_id(&mut conn, 9).unwrap().is_none());
    }

    #[test]
    fn test_run_over_empty_database() {
        let pool = setup();

        ProcessingService::new(pool).run().unwrap();
    }
}
