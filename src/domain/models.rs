use serde::{Deserialize, Serialize};

use crate::analysis::{MatchId, ProfileId, SeasonId};

// --- API Response Structures ---

/// Career standings entry for one thrower
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StandingResponse {
    pub id: ProfileId,
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub active: bool,
}

/// Raw player payload from the axescores API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub leagues: Vec<LeagueResponse>,
}

impl PlayerResponse {
    /// Leagues played under the given ruleset, e.g. "IATF Premier"
    pub fn seasons_for<'a>(&'a self, ruleset: &'a str) -> impl Iterator<Item = &'a LeagueResponse> {
        self.leagues
            .iter()
            .filter(move |l| l.performance_name.as_deref() == Some(ruleset))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeagueResponse {
    pub id: SeasonId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "shortName", default)]
    pub short_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "seasonRank", default)]
    pub season_rank: Option<i64>,
    #[serde(rename = "playoffRank", default)]
    pub playoff_rank: Option<i64>,
    #[serde(rename = "performanceName", default)]
    pub performance_name: Option<String>,
    #[serde(rename = "seasonWeeks", default)]
    pub season_weeks: Vec<SeasonWeekResponse>,
}

impl LeagueResponse {
    /// (week, match id) for every match that has a result
    pub fn played_matches(&self) -> impl Iterator<Item = (i64, MatchId)> + '_ {
        self.season_weeks.iter().flat_map(|w| {
            w.matches
                .iter()
                .filter(|m| m.has_result())
                .map(move |m| (w.week, m.id))
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeasonWeekResponse {
    #[serde(default)]
    pub week: i64,
    #[serde(default)]
    pub matches: Vec<WeekMatchResponse>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeekMatchResponse {
    pub id: MatchId,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl WeekMatchResponse {
    pub fn has_result(&self) -> bool {
        match &self.result {
            serde_json::Value::Null => false,
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => true,
        }
    }
}

/// Raw match payload from the axescores API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchResponse {
    pub id: MatchId,
    pub players: Vec<MatchPlayerResponse>,
    pub rounds: Vec<RoundResponse>,
}

impl MatchResponse {
    pub fn player(&self, profile_id: ProfileId) -> Option<&MatchPlayerResponse> {
        self.players.iter().find(|p| p.id == profile_id)
    }

    pub fn opponent_of(&self, profile_id: ProfileId) -> Option<&MatchPlayerResponse> {
        self.players.iter().find(|p| p.id != profile_id)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchPlayerResponse {
    pub id: ProfileId,
    #[serde(default)]
    pub forfeit: Option<bool>,
}

impl MatchPlayerResponse {
    pub fn has_forfeited(&self) -> bool {
        self.forfeit == Some(true)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoundResponse {
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub name: String,
    pub games: Vec<GameResponse>,
}

impl RoundResponse {
    pub fn game_of(&self, profile_id: ProfileId) -> Option<&GameResponse> {
        self.games.iter().find(|g| g.player == profile_id)
    }

    pub fn game_against(&self, profile_id: ProfileId) -> Option<&GameResponse> {
        self.games.iter().find(|g| g.player != profile_id)
    }
}

/// One player's side of a round
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameResponse {
    pub player: ProfileId,
    pub score: u32,
    #[serde(rename = "Axes", default)]
    pub axes: Vec<AxeResponse>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AxeResponse {
    #[serde(default)]
    pub order: i64,
    pub score: u32,
    #[serde(rename = "clutchCalled", default)]
    pub clutch_called: bool,
}
