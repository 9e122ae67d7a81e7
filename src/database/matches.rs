use std::collections::BTreeSet;

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter};

use super::connection::DbConn;
use super::json::{json_column, to_json};
use super::models::{MatchRow, PendingMatch};
use crate::analysis::{
    Match, MatchId, MatchOutcome, MatchState, MatchStatistics, ProfileId, SeasonId,
};

/// Records a played match for a profile; existing rows are left alone
pub fn insert_if_missing(
    conn: &mut DbConn,
    match_id: MatchId,
    profile_id: ProfileId,
    season_id: SeasonId,
    week: i64,
) -> Result<bool> {
    let sql = "INSERT OR IGNORE INTO matches (matchId, profileId, seasonId, week)
               VALUES (?1, ?2, ?3, ?4)";

    let inserted = conn
        .execute(sql, params![match_id, profile_id, season_id, week])
        .with_context(|| {
            format!("Failed to insert match {} for profile {}", match_id, profile_id)
        })?;
    Ok(inserted > 0)
}

/// Unprocessed rows plus every row of the requested match ids
pub fn list_pending(conn: &mut DbConn, reprocess_ids: &[MatchId]) -> Result<Vec<PendingMatch>> {
    let mut pending = BTreeSet::new();

    let sql = "SELECT matchId, profileId FROM matches WHERE state = ?1";
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![MatchState::Unprocessed.as_i64()], parse_pending_row)?;
    for row in rows {
        pending.insert(row?);
    }

    if !reprocess_ids.is_empty() {
        let placeholders = vec!["?"; reprocess_ids.len()].join(", ");
        let sql = format!(
            "SELECT matchId, profileId FROM matches WHERE matchId IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(reprocess_ids.iter()), parse_pending_row)?;
        for row in rows {
            pending.insert(row?);
        }
    }

    Ok(pending.into_iter().collect())
}

fn parse_pending_row(row: &rusqlite::Row) -> rusqlite::Result<PendingMatch> {
    Ok(PendingMatch {
        match_id: row.get(0)?,
        profile_id: row.get(1)?,
    })
}

/// Overwrites the classification and statistics of one row
pub fn update_classification(
    conn: &mut DbConn,
    record: &Match,
    stats: &MatchStatistics,
) -> Result<()> {
    let sql = "UPDATE matches
               SET opponentId = ?1, state = ?2, outcome = ?3, total = ?4, rounds = ?5, stats = ?6
               WHERE matchId = ?7 AND profileId = ?8";

    conn.execute(
        sql,
        params![
            record.opponent_id,
            record.state.as_i64(),
            record.outcome.map(MatchOutcome::as_str).unwrap_or(""),
            record.total,
            to_json(&record.rounds)?,
            to_json(stats)?,
            record.match_id,
            record.profile_id
        ],
    )
    .with_context(|| {
        format!(
            "Failed to update match {} for profile {}",
            record.match_id, record.profile_id
        )
    })?;
    Ok(())
}

pub fn update_stats(
    conn: &mut DbConn,
    match_id: MatchId,
    profile_id: ProfileId,
    stats: &MatchStatistics,
) -> Result<()> {
    let sql = "UPDATE matches SET stats = ?1 WHERE matchId = ?2 AND profileId = ?3";

    conn.execute(sql, params![to_json(stats)?, match_id, profile_id])
        .context("Failed to update match stats")?;
    Ok(())
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRow> {
    let state_value: i64 = row.get(5)?;
    let state = MatchState::from_i64(state_value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, "unknown match state".into())
    })?;
    let outcome: String = row.get(6)?;

    Ok(MatchRow {
        season_id: row.get(4)?,
        week: row.get(3)?,
        record: Match {
            match_id: row.get(0)?,
            profile_id: row.get(1)?,
            opponent_id: row.get(2)?,
            state,
            outcome: MatchOutcome::parse(&outcome),
            total: row.get(7)?,
            rounds: json_column(row, 8)?,
        },
        stats: json_column(row, 9)?,
    })
}

/// Every row of one profile, newest match first
pub fn list_by_profile(conn: &mut DbConn, profile_id: ProfileId) -> Result<Vec<MatchRow>> {
    let sql = "SELECT matchId, profileId, opponentId, week, seasonId, state, outcome, total,
                      rounds, stats
               FROM matches WHERE profileId = ?1 ORDER BY matchId DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![profile_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read matches of profile {}", profile_id))?;

    Ok(rows)
}

/// Row count per state, for run summaries
pub fn count_by_state(conn: &mut DbConn) -> Result<Vec<(MatchState, i64)>> {
    let sql = "SELECT state, COUNT(*) FROM matches GROUP BY state ORDER BY state ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .filter_map(|(state, count)| MatchState::from_i64(state).map(|s| (s, count)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::round;
    use crate::analysis::{extract_match_statistics, Category};
    use crate::database::setup::ensure_schema;
    use crate::database::{create_memory_pool, get_connection, DbPool};

    fn setup() -> DbPool {
        let pool = create_memory_pool().unwrap();
        ensure_schema(&mut get_connection(&pool).unwrap()).unwrap();
        pool
    }

    fn valid_match(match_id: MatchId) -> Match {
        let rounds = vec![
            round(Category::Hatchet, &[5, 5, 5, 5, 5], 10),
            round(Category::Hatchet, &[3, 3, 3, 3, 3], 20),
            round(Category::Hatchet, &[5, 5, 3, 3, 1], 12),
        ];
        Match {
            match_id,
            profile_id: 1,
            opponent_id: 2,
            state: MatchState::Valid,
            outcome: Some(MatchOutcome::Win),
            total: 57,
            rounds,
        }
    }

    #[test]
    fn test_insert_is_idempotent() {
        let pool = setup();
        let mut conn = get_connection(&pool).unwrap();

        assert!(insert_if_missing(&mut conn, 100, 1, 7, 1).unwrap());
        assert!(!insert_if_missing(&mut conn, 100, 1, 7, 1).unwrap());
        assert!(insert_if_missing(&mut conn, 100, 2, 7, 1).unwrap());

        let pending = list_pending(&mut conn, &[]).unwrap();
        assert_eq!(
            pending,
            vec![
                PendingMatch { match_id: 100, profile_id: 1 },
                PendingMatch { match_id: 100, profile_id: 2 },
            ]
        );
    }

    #[test]
    fn test_classification_round_trips() {
        let pool = setup();
        let mut conn = get_connection(&pool).unwrap();
        insert_if_missing(&mut conn, 100, 1, 7, 3).unwrap();

        let record = valid_match(100);
        let stats = extract_match_statistics(&record.rounds);
        update_classification(&mut conn, &record, &stats).unwrap();

        let rows = list_by_profile(&mut conn, 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record, record);
        assert_eq!(rows[0].stats, stats);
        assert_eq!(rows[0].season_id, 7);
        assert_eq!(rows[0].week, 3);
        assert!(list_pending(&mut conn, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_reprocess_ids_are_pending_again() {
        let pool = setup();
        let mut conn = get_connection(&pool).unwrap();
        insert_if_missing(&mut conn, 100, 1, 7, 1).unwrap();
        insert_if_missing(&mut conn, 200, 1, 7, 2).unwrap();
        for id in [100, 200] {
            let record = valid_match(id);
            let stats = extract_match_statistics(&record.rounds);
            update_classification(&mut conn, &record, &stats).unwrap();
        }
        insert_if_missing(&mut conn, 300, 1, 7, 3).unwrap();

        let pending = list_pending(&mut conn, &[200]).unwrap();

        let ids: Vec<MatchId> = pending.iter().map(|p| p.match_id).collect();
        assert_eq!(ids, vec![200, 300]);
    }

    #[test]
    fn test_tagged_states_store_empty_outcome() {
        let pool = setup();
        let mut conn = get_connection(&pool).unwrap();
        insert_if_missing(&mut conn, 100, 1, 7, 1).unwrap();
        insert_if_missing(&mut conn, 101, 1, 7, 1).unwrap();

        let forfeit = Match::tagged(100, 1, 2, MatchState::Forfeit);
        let unresolved = Match::tagged(101, 1, 2, MatchState::Unresolved);
        update_classification(&mut conn, &forfeit, &MatchStatistics::default()).unwrap();
        update_classification(&mut conn, &unresolved, &MatchStatistics::default()).unwrap();

        let rows = list_by_profile(&mut conn, 1).unwrap();
        assert_eq!(rows[0].record, unresolved);
        assert_eq!(rows[1].record, forfeit);

        let counts = count_by_state(&mut conn).unwrap();
        assert_eq!(counts, vec![(MatchState::Forfeit, 1), (MatchState::Unresolved, 1)]);
    }
}
