use super::acr::axe_charts_rating;
use super::numeric::{median, percent, ratio};
use super::types::{
    AggregateStatistics, CategoryAggregate, CategoryCounters, ClutchAggregate, MatchAggregate,
    MatchOutcome, MatchStatistics, MatchSummary, TargetAggregate,
};

/// Raw sums over a set of matches, before any ratio is derived.
///
/// Totals over disjoint sets can be added together; ratios are always derived
/// from the combined totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTotals {
    pub win: u32,
    pub loss: u32,
    pub otl: u32,
    pub win_without_big_axe: u32,
    pub scores: Vec<u32>,
    pub stats: MatchStatistics,
}

impl MatchTotals {
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a MatchSummary>) -> Self {
        let mut totals = Self::default();
        for summary in matches {
            totals.add(summary);
        }
        totals
    }

    pub fn add(&mut self, summary: &MatchSummary) {
        match summary.outcome {
            MatchOutcome::Win => self.win += 1,
            MatchOutcome::Loss => self.loss += 1,
            MatchOutcome::OvertimeLoss => self.otl += 1,
        }
        if summary.outcome == MatchOutcome::Win && summary.stats.big_axe.round_count == 0 {
            self.win_without_big_axe += 1;
        }
        self.scores.push(summary.total);
        self.stats += summary.stats;
    }

    pub fn merge(&mut self, other: &MatchTotals) {
        self.win += other.win;
        self.loss += other.loss;
        self.otl += other.otl;
        self.win_without_big_axe += other.win_without_big_axe;
        self.scores.extend_from_slice(&other.scores);
        self.stats += other.stats;
    }

    pub fn count(&self) -> u32 {
        self.scores.len() as u32
    }

    pub fn total_score(&self) -> u32 {
        self.scores.iter().sum()
    }

    pub fn finish(&self) -> AggregateStatistics {
        AggregateStatistics {
            matches: self.match_aggregate(),
            hatchet: category_aggregate(&self.stats.hatchet),
            big_axe: category_aggregate(&self.stats.big_axe),
            acr: axe_charts_rating(&self.stats.hatchet, &self.stats.big_axe),
        }
    }

    fn match_aggregate(&self) -> MatchAggregate {
        let count = self.count();
        let total_score = self.total_score();

        MatchAggregate {
            win: self.win,
            win_percent: percent(self.win, count),
            loss: self.loss,
            loss_percent: percent(self.loss, count),
            otl: self.otl,
            otl_percent: percent(self.otl, count),
            win_without_big_axe: self.win_without_big_axe,
            win_without_big_axe_percent: percent(self.win_without_big_axe, count),
            count,
            total_score,
            average_score: ratio(total_score, count),
            min_score: self.scores.iter().copied().min().unwrap_or(0),
            median_score: median(&self.scores),
            max_score: self.scores.iter().copied().max().unwrap_or(0),
        }
    }
}

/// Summary statistics over a set of valid matches, recomputed from scratch
pub fn aggregate<'a>(matches: impl IntoIterator<Item = &'a MatchSummary>) -> AggregateStatistics {
    MatchTotals::from_matches(matches).finish()
}

fn category_aggregate(c: &CategoryCounters) -> CategoryAggregate {
    let throw_count = c.throw_count();

    CategoryAggregate {
        round_win: c.round_win,
        round_win_percent: percent(c.round_win, c.round_count),
        round_loss: c.round_loss,
        round_loss_percent: percent(c.round_loss, c.round_count),
        round_tie: c.round_tie,
        round_tie_percent: percent(c.round_tie, c.round_count),
        round_count: c.round_count,
        total_score: c.total_score,
        throw_count,
        score_per_throw: ratio(c.total_score, throw_count),
        clutch: ClutchAggregate {
            call: c.clutch.call,
            call_percent: percent(c.clutch.call, c.round_count),
            hit: c.clutch.hit,
            hit_percent: percent(c.clutch.hit, c.clutch.call),
            total_score: c.clutch.total_score,
            ev: ratio(c.clutch.total_score, c.clutch.call),
        },
        target: TargetAggregate {
            five: c.target.five,
            three: c.target.three,
            one: c.target.one,
            drop: c.target.drop,
            five_percent: percent(c.target.five, c.target.throw_count),
            three_percent: percent(c.target.three, c.target.throw_count),
            one_percent: percent(c.target.one, c.target.throw_count),
            drop_percent: percent(c.target.drop, c.target.throw_count),
            total_score: c.target.total_score,
            throw_count: c.target.throw_count,
            ev: ratio(c.target.total_score, c.target.throw_count),
        },
    }
}
