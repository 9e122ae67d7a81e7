use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::json::{json_column, to_json};
use super::models::{Season, SeasonInfo};
use crate::analysis::{AggregateStatistics, ProfileId, SeasonId};

pub fn upsert_season(conn: &mut DbConn, info: &SeasonInfo) -> Result<()> {
    let sql = "INSERT INTO seasons
                   (profileId, seasonId, name, shortName, date, seasonRank, playoffRank)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(seasonId, profileId) DO UPDATE SET
                   name = excluded.name,
                   shortName = excluded.shortName,
                   date = excluded.date,
                   seasonRank = excluded.seasonRank,
                   playoffRank = excluded.playoffRank";

    conn.execute(
        sql,
        params![
            info.profile_id,
            info.season_id,
            info.name,
            info.short_name,
            info.date,
            info.season_rank,
            info.playoff_rank
        ],
    )
    .with_context(|| {
        format!(
            "Failed to upsert season {} for profile {}",
            info.season_id, info.profile_id
        )
    })?;
    Ok(())
}

pub fn update_stats(
    conn: &mut DbConn,
    profile_id: ProfileId,
    season_id: SeasonId,
    stats: &AggregateStatistics,
) -> Result<()> {
    let sql = "UPDATE seasons SET stats = ?1 WHERE seasonId = ?2 AND profileId = ?3";

    conn.execute(sql, params![to_json(stats)?, season_id, profile_id])
        .context("Failed to update season stats")?;
    Ok(())
}

fn parse_season_row(row: &rusqlite::Row) -> rusqlite::Result<Season> {
    Ok(Season {
        profile_id: row.get(0)?,
        season_id: row.get(1)?,
        name: row.get(2)?,
        short_name: row.get(3)?,
        date: row.get(4)?,
        season_rank: row.get(5)?,
        playoff_rank: row.get(6)?,
        stats: json_column(row, 7)?,
    })
}

/// Seasons of one profile, oldest first
pub fn list_by_profile(conn: &mut DbConn, profile_id: ProfileId) -> Result<Vec<Season>> {
    let sql = "SELECT profileId, seasonId, name, shortName, date, seasonRank, playoffRank, stats
               FROM seasons WHERE profileId = ?1 ORDER BY seasonId ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![profile_id], parse_season_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::ensure_schema;
    use crate::database::{create_memory_pool, get_connection};

    fn season(season_id: SeasonId, season_rank: i64) -> SeasonInfo {
        SeasonInfo {
            profile_id: 1,
            season_id,
            name: format!("Season {}", season_id),
            short_name: format!("S{}", season_id),
            date: "2023-01-01".to_string(),
            season_rank,
            playoff_rank: 0,
        }
    }

    #[test]
    fn test_upsert_and_update_stats() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();

        upsert_season(&mut conn, &season(20, 4)).unwrap();
        upsert_season(&mut conn, &season(10, 2)).unwrap();
        upsert_season(&mut conn, &season(20, 1)).unwrap();

        let mut stats = AggregateStatistics::default();
        stats.matches.count = 8;
        update_stats(&mut conn, 1, 20, &stats).unwrap();

        let seasons = list_by_profile(&mut conn, 1).unwrap();
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].season_id, 10);
        assert_eq!(seasons[1].season_rank, 1);
        assert_eq!(seasons[1].stats.matches.count, 8);
        assert_eq!(seasons[0].stats, AggregateStatistics::default());
        assert!(list_by_profile(&mut conn, 2).unwrap().is_empty());
    }
}
