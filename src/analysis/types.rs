use std::ops::{AddAssign, Index, IndexMut};

use serde::{Deserialize, Serialize};

pub type ProfileId = i64;
pub type MatchId = i64;
pub type SeasonId = i64;

/// Points for hitting the clutch target
pub const CLUTCH_HIT_SCORE: u32 = 7;
/// Highest target-zone value, used as the per-throw ACR denominator
pub const MAX_TARGET_SCORE: u32 = 5;
/// Rounds beyond this count mark a scrape as malformed (tie break included)
pub const MAX_ROUND_COUNT: usize = 4;
/// Round name the site uses for the big axe round
pub const TIE_BREAK_ROUND_NAME: &str = "Tie Break";

/// Round category: ordinary hatchet rounds versus the sudden-death big axe round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Hatchet,
    BigAxe,
}

impl Category {
    pub fn from_tie_break(is_tie_break: bool) -> Self {
        if is_tie_break {
            Category::BigAxe
        } else {
            Category::Hatchet
        }
    }

    pub fn is_big_axe(self) -> bool {
        matches!(self, Category::BigAxe)
    }
}

/// One value per round category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerCategory<T> {
    pub hatchet: T,
    pub big_axe: T,
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        match category {
            Category::Hatchet => &self.hatchet,
            Category::BigAxe => &self.big_axe,
        }
    }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Hatchet => &mut self.hatchet,
            Category::BigAxe => &mut self.big_axe,
        }
    }
}

impl<T: AddAssign + Copy> AddAssign for PerCategory<T> {
    fn add_assign(&mut self, other: Self) {
        self.hatchet += other.hatchet;
        self.big_axe += other.big_axe;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Win,
    Loss,
    Tie,
}

impl RoundOutcome {
    pub fn letter(self) -> char {
        match self {
            RoundOutcome::Win => 'W',
            RoundOutcome::Loss => 'L',
            RoundOutcome::Tie => 'T',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Loss,
    #[serde(rename = "OTL")]
    OvertimeLoss,
}

impl MatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOutcome::Win => "Win",
            MatchOutcome::Loss => "Loss",
            MatchOutcome::OvertimeLoss => "OTL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Win" => Some(MatchOutcome::Win),
            "Loss" => Some(MatchOutcome::Loss),
            "OTL" => Some(MatchOutcome::OvertimeLoss),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            MatchOutcome::Win => 'W',
            MatchOutcome::Loss => 'L',
            MatchOutcome::OvertimeLoss => 'O',
        }
    }
}

/// Processing state of a stored match row. Discriminants are the stored column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Unprocessed = 0,
    Invalid = 1,
    Forfeit = 2,
    Valid = 3,
    Unresolved = 4,
}

impl MatchState {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(MatchState::Unprocessed),
            1 => Some(MatchState::Invalid),
            2 => Some(MatchState::Forfeit),
            3 => Some(MatchState::Valid),
            4 => Some(MatchState::Unresolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Throw {
    pub score: u32,
    pub is_clutch: bool,
}

impl Throw {
    pub fn target(score: u32) -> Self {
        Self { score, is_clutch: false }
    }

    pub fn clutch(score: u32) -> Self {
        Self { score, is_clutch: true }
    }

    pub fn is_clutch_hit(&self) -> bool {
        self.is_clutch && self.score == CLUTCH_HIT_SCORE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub category: Category,
    pub outcome: RoundOutcome,
    pub total: u32,
    pub opponent_total: u32,
    pub throws: Vec<Throw>,
    #[serde(default)]
    pub opponent_throws: Vec<Throw>,
}

impl Round {
    pub fn is_big_axe(&self) -> bool {
        self.category.is_big_axe()
    }
}

/// One profile's view of a head-to-head match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub match_id: MatchId,
    pub profile_id: ProfileId,
    pub opponent_id: ProfileId,
    pub state: MatchState,
    pub outcome: Option<MatchOutcome>,
    pub total: u32,
    pub rounds: Vec<Round>,
}

impl Match {
    /// A match record carrying only a state tag: no outcome, no score, no rounds
    pub fn tagged(
        match_id: MatchId,
        profile_id: ProfileId,
        opponent_id: ProfileId,
        state: MatchState,
    ) -> Self {
        Self {
            match_id,
            profile_id,
            opponent_id,
            state,
            outcome: None,
            total: 0,
            rounds: Vec::new(),
        }
    }

    pub fn hatchet_rounds(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(|r| !r.is_big_axe())
    }

    pub fn big_axe_round(&self) -> Option<&Round> {
        self.rounds.iter().find(|r| r.is_big_axe())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClutchCounters {
    pub call: u32,
    pub hit: u32,
    pub total_score: u32,
}

impl AddAssign for ClutchCounters {
    fn add_assign(&mut self, other: Self) {
        self.call += other.call;
        self.hit += other.hit;
        self.total_score += other.total_score;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCounters {
    pub five: u32,
    pub three: u32,
    pub one: u32,
    pub drop: u32,
    pub total_score: u32,
    pub throw_count: u32,
}

impl AddAssign for TargetCounters {
    fn add_assign(&mut self, other: Self) {
        self.five += other.five;
        self.three += other.three;
        self.one += other.one;
        self.drop += other.drop;
        self.total_score += other.total_score;
        self.throw_count += other.throw_count;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounters {
    pub round_win: u32,
    pub round_loss: u32,
    pub round_tie: u32,
    pub round_count: u32,
    pub total_score: u32,
    pub clutch: ClutchCounters,
    pub target: TargetCounters,
}

impl CategoryCounters {
    /// Clutch attempts plus target attempts
    pub fn throw_count(&self) -> u32 {
        self.clutch.call + self.target.throw_count
    }
}

impl AddAssign for CategoryCounters {
    fn add_assign(&mut self, other: Self) {
        self.round_win += other.round_win;
        self.round_loss += other.round_loss;
        self.round_tie += other.round_tie;
        self.round_count += other.round_count;
        self.total_score += other.total_score;
        self.clutch += other.clutch;
        self.target += other.target;
    }
}

/// Per-match counters, partitioned by round category
pub type MatchStatistics = PerCategory<CategoryCounters>;

/// What the aggregator needs from one valid match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub outcome: MatchOutcome,
    pub total: u32,
    pub stats: MatchStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAggregate {
    pub win: u32,
    pub win_percent: f64,
    pub loss: u32,
    pub loss_percent: f64,
    pub otl: u32,
    pub otl_percent: f64,
    pub win_without_big_axe: u32,
    pub win_without_big_axe_percent: f64,
    pub count: u32,
    pub total_score: u32,
    pub average_score: f64,
    pub min_score: u32,
    pub median_score: f64,
    pub max_score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClutchAggregate {
    pub call: u32,
    pub call_percent: f64,
    pub hit: u32,
    pub hit_percent: f64,
    pub total_score: u32,
    pub ev: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAggregate {
    pub five: u32,
    pub three: u32,
    pub one: u32,
    pub drop: u32,
    pub five_percent: f64,
    pub three_percent: f64,
    pub one_percent: f64,
    pub drop_percent: f64,
    pub total_score: u32,
    pub throw_count: u32,
    pub ev: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub round_win: u32,
    pub round_win_percent: f64,
    pub round_loss: u32,
    pub round_loss_percent: f64,
    pub round_tie: u32,
    pub round_tie_percent: f64,
    pub round_count: u32,
    pub total_score: u32,
    pub throw_count: u32,
    pub score_per_throw: f64,
    pub clutch: ClutchAggregate,
    pub target: TargetAggregate,
}

/// Axe Charts Rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxeChartsRating {
    pub points_earned: u32,
    pub points_available: u32,
    pub rating: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStatistics {
    #[serde(rename = "match")]
    pub matches: MatchAggregate,
    pub hatchet: CategoryAggregate,
    pub big_axe: CategoryAggregate,
    pub acr: AxeChartsRating,
}
