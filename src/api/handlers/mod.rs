use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::analysis::{aggregate, MatchOutcome, MatchState, ProfileId};
use crate::api::models::{
    ComparedProfile, ComparisonResponse, HeadToHeadMatch, HeadToHeadStats, ProfileListItem,
    ProfileListResponse,
};
use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, DbPool, MatchRow};
use crate::render::{OpponentView, ProfileView};

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

fn internal_error(context: &str, e: impl std::fmt::Display) -> Response {
    log::error!("{}: {}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{}: {}", context, e)).into_response()
}

fn not_found(profile_id: ProfileId) -> Response {
    (StatusCode::NOT_FOUND, format!("Profile {} not found", profile_id)).into_response()
}

fn connection(state: &AppState) -> Result<DbConn, Response> {
    database::get_connection(&state.pool).map_err(|e| internal_error("DB Connection Error", e))
}

pub async fn get_profiles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let profiles = match database::profiles::list_all(&mut conn) {
        Ok(profiles) => profiles,
        Err(e) => return internal_error("Query Error", e),
    };

    let items: Vec<ProfileListItem> = profiles.iter().map(ProfileListItem::from).collect();
    Json(ProfileListResponse {
        total: items.len(),
        items,
    })
    .into_response()
}

pub async fn get_profile_detail(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<ProfileId>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let profile = match database::profiles::find_by_id(&mut conn, profile_id) {
        Ok(Some(profile)) => profile,
        Ok(None) => return not_found(profile_id),
        Err(e) => return internal_error("Query Error", e),
    };

    let loaded = database::profiles::list_all(&mut conn).and_then(|all| {
        let seasons = database::seasons::list_by_profile(&mut conn, profile_id)?;
        let matches = database::matches::list_by_profile(&mut conn, profile_id)?;
        Ok((all, seasons, matches))
    });
    let (all, seasons, matches) = match loaded {
        Ok(data) => data,
        Err(e) => return internal_error("Query Error", e),
    };

    let by_id: HashMap<ProfileId, _> = all.iter().map(|p| (p.profile_id, p)).collect();
    let view = ProfileView::new(&profile, &seasons, &matches, |id| {
        by_id.get(&id).copied().map(OpponentView::of)
    });

    Json(&view).into_response()
}

pub async fn get_comparison(
    State(state): State<Arc<AppState>>,
    Path((left_id, right_id)): Path<(ProfileId, ProfileId)>,
) -> impl IntoResponse {
    let mut conn = match connection(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    let mut load = |id: ProfileId| match database::profiles::find_by_id(&mut conn, id) {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(not_found(id)),
        Err(e) => Err(internal_error("Query Error", e)),
    };
    let left = match load(left_id) {
        Ok(p) => p,
        Err(response) => return response,
    };
    let right = match load(right_id) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let rows = match database::matches::list_by_profile(&mut conn, left_id) {
        Ok(rows) => rows,
        Err(e) => return internal_error("Query Error", e),
    };
    let meetings = meetings_against(&rows, right_id);

    let summaries: Vec<_> = meetings.iter().filter_map(|row| row.record.summary()).collect();
    let (stats, matches) = head_to_head(&meetings);

    Json(ComparisonResponse {
        left: ComparedProfile::from(left),
        right: ComparedProfile::from(right),
        head_to_head: aggregate(&summaries),
        stats,
        matches,
    })
    .into_response()
}

/// Valid matches of `rows` played against `opponent_id`
pub fn meetings_against(rows: &[MatchRow], opponent_id: ProfileId) -> Vec<&MatchRow> {
    rows.iter()
        .filter(|r| r.record.state == MatchState::Valid && r.record.opponent_id == opponent_id)
        .collect()
}

pub fn head_to_head(meetings: &[&MatchRow]) -> (HeadToHeadStats, Vec<HeadToHeadMatch>) {
    let mut stats = HeadToHeadStats::default();
    let mut matches = Vec::new();

    for row in meetings {
        let Some(outcome) = row.record.outcome else {
            continue;
        };
        stats.total_matches += 1;
        if outcome == MatchOutcome::Win {
            stats.left_wins += 1;
        } else {
            stats.right_wins += 1;
        }

        let right_total = row
            .record
            .hatchet_rounds()
            .map(|r| r.opponent_total)
            .sum();
        matches.push(HeadToHeadMatch {
            match_id: row.match_id(),
            outcome,
            left_total: row.record.total,
            right_total,
        });
    }

    (stats, matches)
}
