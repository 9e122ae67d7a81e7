use serde::Serialize;

use crate::analysis::{AggregateStatistics, MatchId, MatchOutcome, ProfileId};
use crate::database::Profile;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListItem {
    pub profile_id: ProfileId,
    pub name: String,
    pub rank: i64,
    pub rating: i64,
    pub image: String,
    pub acr: u32,
    pub match_count: u32,
    pub win_percent: f64,
}

impl From<&Profile> for ProfileListItem {
    fn from(p: &Profile) -> Self {
        Self {
            profile_id: p.profile_id,
            name: p.name.clone(),
            rank: p.rank,
            rating: p.rating,
            image: p.image.clone(),
            acr: p.stats.acr.rating,
            match_count: p.stats.matches.count,
            win_percent: p.stats.matches.win_percent,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListResponse {
    pub items: Vec<ProfileListItem>,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparedProfile {
    pub profile_id: ProfileId,
    pub name: String,
    pub rank: i64,
    pub rating: i64,
    pub stats: AggregateStatistics,
}

impl From<Profile> for ComparedProfile {
    fn from(p: Profile) -> Self {
        Self {
            profile_id: p.profile_id,
            name: p.name,
            rank: p.rank,
            rating: p.rating,
            stats: p.stats,
        }
    }
}

/// One meeting, from the left profile's point of view
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadMatch {
    pub match_id: MatchId,
    pub outcome: MatchOutcome,
    pub left_total: u32,
    pub right_total: u32,
}

#[derive(Serialize, Default, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadStats {
    pub total_matches: u32,
    pub left_wins: u32,
    pub right_wins: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub left: ComparedProfile,
    pub right: ComparedProfile,
    /// Stats of the left profile's matches against the right one
    pub head_to_head: AggregateStatistics,
    pub stats: HeadToHeadStats,
    pub matches: Vec<HeadToHeadMatch>,
}
