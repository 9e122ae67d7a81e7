use serde::Serialize;

use crate::analysis::{MatchState, ProfileId};
use crate::database::{MatchRow, Profile, Season};

/// A profile with its seasons and valid matches, as published
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView<'a> {
    #[serde(flatten)]
    pub profile: &'a Profile,
    /// Newest first, `order` counts from the oldest
    pub seasons: Vec<SeasonEntry<'a>>,
    pub matches: Vec<MatchEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SeasonEntry<'a> {
    pub order: usize,
    #[serde(flatten)]
    pub season: &'a Season,
}

#[derive(Debug, Serialize)]
pub struct MatchEntry<'a> {
    #[serde(flatten)]
    pub row: &'a MatchRow,
    pub opponent: Option<OpponentView<'a>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentView<'a> {
    pub profile_id: ProfileId,
    pub name: &'a str,
    pub image: &'a str,
}

impl<'a> OpponentView<'a> {
    pub fn of(profile: &'a Profile) -> Self {
        Self {
            profile_id: profile.profile_id,
            name: &profile.name,
            image: &profile.image,
        }
    }
}

impl<'a> ProfileView<'a> {
    /// `seasons` oldest first and `matches` in any state; only valid matches
    /// are kept
    pub fn new(
        profile: &'a Profile,
        seasons: &'a [Season],
        matches: &'a [MatchRow],
        opponent: impl Fn(ProfileId) -> Option<OpponentView<'a>>,
    ) -> Self {
        let seasons = seasons
            .iter()
            .enumerate()
            .map(|(i, season)| SeasonEntry { order: i + 1, season })
            .rev()
            .collect();
        let matches = matches
            .iter()
            .filter(|row| row.record.state == MatchState::Valid)
            .map(|row| MatchEntry {
                row,
                opponent: opponent(row.record.opponent_id),
            })
            .collect();

        Self {
            profile,
            seasons,
            matches,
        }
    }
}
