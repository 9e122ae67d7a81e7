use serde::Serialize;

use crate::analysis::{
    AggregateStatistics, EarnedBadge, Match, MatchId, MatchStatistics, ProfileId, SeasonId,
};

/// Profile fields that come from the scraper
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInfo {
    pub profile_id: ProfileId,
    pub name: String,
    pub about: String,
    pub rank: i64,
    pub rating: i64,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_id: ProfileId,
    pub name: String,
    pub about: String,
    pub rank: i64,
    pub rating: i64,
    pub image: String,
    pub stats: AggregateStatistics,
    pub badges: Vec<EarnedBadge>,
}

/// Season fields that come from the scraper
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonInfo {
    pub profile_id: ProfileId,
    pub season_id: SeasonId,
    pub name: String,
    pub short_name: String,
    pub date: String,
    pub season_rank: i64,
    pub playoff_rank: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub profile_id: ProfileId,
    pub season_id: SeasonId,
    pub name: String,
    pub short_name: String,
    pub date: String,
    pub season_rank: i64,
    pub playoff_rank: i64,
    pub stats: AggregateStatistics,
}

/// A stored match row: one profile's side of a match
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRow {
    pub season_id: SeasonId,
    pub week: i64,
    #[serde(flatten)]
    pub record: Match,
    pub stats: MatchStatistics,
}

impl MatchRow {
    pub fn match_id(&self) -> MatchId {
        self.record.match_id
    }
}

/// A (match, profile) pair waiting to be fetched and classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PendingMatch {
    pub match_id: MatchId,
    pub profile_id: ProfileId,
}
