use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::json::{json_column, to_json};
use super::models::{Profile, ProfileInfo};
use crate::analysis::{AggregateStatistics, EarnedBadge, ProfileId};

const PROFILE_COLUMNS: &str = "profileId, name, about, rank, rating, image, stats, badges";

/// Inserts or refreshes the scraped fields; stats and badges are kept
pub fn upsert_profile(conn: &mut DbConn, info: &ProfileInfo) -> Result<()> {
    let sql = "INSERT INTO profiles (profileId, name, about, rank, rating, image)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)
               ON CONFLICT(profileId) DO UPDATE SET
                   name = excluded.name,
                   about = excluded.about,
                   rank = excluded.rank,
                   rating = excluded.rating,
                   image = excluded.image";

    conn.execute(
        sql,
        params![
            info.profile_id,
            info.name,
            info.about,
            info.rank,
            info.rating,
            info.image
        ],
    )
    .with_context(|| format!("Failed to upsert profile {}", info.profile_id))?;
    Ok(())
}

pub fn update_analysis(
    conn: &mut DbConn,
    profile_id: ProfileId,
    stats: &AggregateStatistics,
    badges: &[EarnedBadge],
) -> Result<()> {
    let sql = "UPDATE profiles SET stats = ?1, badges = ?2 WHERE profileId = ?3";

    conn.execute(sql, params![to_json(stats)?, to_json(&badges)?, profile_id])
        .with_context(|| format!("Failed to update stats for profile {}", profile_id))?;
    Ok(())
}

fn parse_profile_row(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        profile_id: row.get(0)?,
        name: row.get(1)?,
        about: row.get(2)?,
        rank: row.get(3)?,
        rating: row.get(4)?,
        image: row.get(5)?,
        stats: json_column(row, 6)?,
        badges: json_column(row, 7)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, profile_id: ProfileId) -> Result<Option<Profile>> {
    let sql = format!("SELECT {} FROM profiles WHERE profileId = ?1", PROFILE_COLUMNS);

    conn.query_row(&sql, params![profile_id], parse_profile_row)
        .optional()
        .context("Failed to query profile by id")
}

/// Every profile, best ranked first
pub fn list_all(conn: &mut DbConn) -> Result<Vec<Profile>> {
    let sql = format!(
        "SELECT {} FROM profiles ORDER BY rank ASC, rating DESC",
        PROFILE_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_profile_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_ids(conn: &mut DbConn) -> Result<Vec<ProfileId>> {
    let mut stmt = conn.prepare("SELECT profileId FROM profiles ORDER BY profileId ASC")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
