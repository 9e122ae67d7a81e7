use serde::{Deserialize, Serialize};

use super::types::{AggregateStatistics, Match, MatchOutcome, Round};

const NATURAL_ROUND: u32 = 25;
const NATURAL_MATCH: u32 = 75;
const PERFECT_MATCH: u32 = 81;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeKind {
    Round,
    Match,
    Season,
    Secret,
}

/// Season-level facts the season badges look at
#[derive(Debug, Clone, Copy)]
pub struct SeasonView<'a> {
    pub season_rank: i64,
    pub playoff_rank: i64,
    pub stats: &'a AggregateStatistics,
}

/// Everything known about one profile when badges are evaluated
#[derive(Debug, Clone)]
pub struct BadgeContext<'a> {
    /// Valid matches only
    pub matches: &'a [Match],
    pub seasons: Vec<SeasonView<'a>>,
    pub career: &'a AggregateStatistics,
}

pub struct Badge {
    pub title: &'static str,
    pub description: &'static str,
    pub kind: BadgeKind,
    earned: fn(&BadgeContext) -> bool,
}

impl Badge {
    pub fn is_earned(&self, ctx: &BadgeContext) -> bool {
        (self.earned)(ctx)
    }

    pub fn to_earned(&self) -> EarnedBadge {
        EarnedBadge {
            title: self.title.to_string(),
            description: self.description.to_string(),
            kind: self.kind,
        }
    }
}

/// Stored form of a badge a profile has earned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub title: String,
    pub description: String,
    pub kind: BadgeKind,
}

pub static BADGES: &[Badge] = &[
    // Round
    Badge {
        title: "Unnatural Round",
        description: "Score 25 points in a round with a clutch hit",
        kind: BadgeKind::Round,
        earned: |ctx| any_hatchet_round(ctx, |r| r.total == NATURAL_ROUND && has_clutch_hit(r)),
    },
    Badge {
        title: "Natural Round",
        description: "Score 25 points in a round without a clutch hit",
        kind: BadgeKind::Round,
        earned: |ctx| any_hatchet_round(ctx, |r| r.total == NATURAL_ROUND && !has_clutch_hit(r)),
    },
    Badge {
        title: "Supernatural Round",
        description: "Score more than 25 points in a round",
        kind: BadgeKind::Round,
        earned: |ctx| any_hatchet_round(ctx, |r| r.total > NATURAL_ROUND),
    },
    Badge {
        title: "Overtime Win",
        description: "Win a round of Big Axe",
        kind: BadgeKind::Round,
        earned: |ctx| {
            ctx.matches
                .iter()
                .any(|m| m.outcome == Some(MatchOutcome::Win) && m.big_axe_round().is_some())
        },
    },
    Badge {
        title: "Clutch Party",
        description: "Call a clutch with a Big Axe",
        kind: BadgeKind::Round,
        earned: |ctx| ctx.career.big_axe.clutch.call > 0,
    },
    Badge {
        title: "Long Shot",
        description: "Hit a clutch with a Big Axe",
        kind: BadgeKind::Round,
        earned: |ctx| ctx.career.big_axe.clutch.hit > 0,
    },
    // Match
    Badge {
        title: "Unnatural Match",
        description: "Score 75 points in a match with a clutch hit",
        kind: BadgeKind::Match,
        earned: |ctx| {
            ctx.matches
                .iter()
                .any(|m| m.total == NATURAL_MATCH && hatchet_clutch_hits(m) > 0)
        },
    },
    Badge {
        title: "Natural Match",
        description: "Score 75 points in a match without a clutch hit",
        kind: BadgeKind::Match,
        earned: |ctx| {
            ctx.matches
                .iter()
                .any(|m| m.total == NATURAL_MATCH && hatchet_clutch_hits(m) == 0)
        },
    },
    Badge {
        title: "Supernatural Match",
        description: "Score more than 75 points in a match",
        kind: BadgeKind::Match,
        earned: |ctx| {
            ctx.matches
                .iter()
                .any(|m| m.total > NATURAL_MATCH && m.total < PERFECT_MATCH)
        },
    },
    Badge {
        title: "777",
        description: "Hit all three clutches in a match",
        kind: BadgeKind::Match,
        earned: |ctx| ctx.matches.iter().any(|m| hatchet_clutch_hits(m) == 3),
    },
    Badge {
        title: "Perfection",
        description: "Score 81 points in a match",
        kind: BadgeKind::Match,
        earned: |ctx| ctx.matches.iter().any(|m| m.total == PERFECT_MATCH),
    },
    // Season
    Badge {
        title: "High Marks",
        description: "Complete a season with an average score of 70 or higher",
        kind: BadgeKind::Season,
        earned: |ctx| ctx.seasons.iter().any(|s| s.stats.matches.average_score >= 70.0),
    },
    Badge {
        title: "Shot Caller",
        description: "Complete a season with a clutch call rate of 100%",
        kind: BadgeKind::Season,
        earned: |ctx| ctx.seasons.iter().any(|s| s.stats.hatchet.clutch.call_percent == 100.0),
    },
    Badge {
        title: "Top Performer",
        description: "Complete a season with the #1 regular season rank",
        kind: BadgeKind::Season,
        earned: |ctx| ctx.seasons.iter().any(|s| s.season_rank == 1),
    },
    Badge {
        title: "Champion",
        description: "Complete a season with the #1 playoff rank",
        kind: BadgeKind::Season,
        earned: |ctx| ctx.seasons.iter().any(|s| s.playoff_rank == 1),
    },
    // Secret
    Badge {
        title: "No Cigar",
        description: "Score 79 points in a match",
        kind: BadgeKind::Secret,
        earned: |ctx| ctx.matches.iter().any(|m| m.total == 79),
    },
    Badge {
        title: "Around the World",
        description: "Throw a hatchet round with the scores 1, 3, 5, 3, 1 in that order",
        kind: BadgeKind::Secret,
        earned: |ctx| {
            any_hatchet_round(ctx, |r| {
                r.throws.iter().map(|t| t.score).eq([1, 3, 5, 3, 1])
            })
        },
    },
];

pub fn earned_badges(ctx: &BadgeContext) -> Vec<EarnedBadge> {
    BADGES
        .iter()
        .filter(|b| b.is_earned(ctx))
        .map(Badge::to_earned)
        .collect()
}

fn any_hatchet_round(ctx: &BadgeContext, predicate: impl Fn(&Round) -> bool) -> bool {
    ctx.matches
        .iter()
        .flat_map(|m| m.hatchet_rounds())
        .any(predicate)
}

fn has_clutch_hit(r: &Round) -> bool {
    r.throws.iter().any(|t| t.is_clutch_hit())
}

fn hatchet_clutch_hits(m: &Match) -> usize {
    m.hatchet_rounds()
        .flat_map(|r| r.throws.iter())
        .filter(|t| t.is_clutch_hit())
        .count()
}
