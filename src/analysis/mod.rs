pub mod acr;
pub mod aggregator;
pub mod badges;
pub mod classifier;
pub mod extractor;
pub mod numeric;
pub mod types;

pub use acr::axe_charts_rating;
pub use aggregator::{aggregate, MatchTotals};
pub use badges::{earned_badges, BadgeContext, BadgeKind, EarnedBadge, SeasonView, BADGES};
pub use classifier::{classify_match, classify_or_tag, classify_round, MatchError};
pub use extractor::extract_match_statistics;
pub use types::*;

impl Match {
    /// Aggregation input for a valid match; `None` for every other state
    pub fn summary(&self) -> Option<MatchSummary> {
        if self.state != MatchState::Valid {
            return None;
        }
        Some(MatchSummary {
            outcome: self.outcome?,
            total: self.total,
            stats: extract_match_statistics(&self.rounds),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{raw_match, raw_round};
    use super::*;

    #[test]
    fn test_summary_only_for_valid_matches() {
        let raw = raw_match(
            1,
            vec![
                raw_round(1, "Round 1", &[5, 5, 5, 5, 5], &[3, 3, 3, 3, 3]),
                raw_round(2, "Round 2", &[5, 5, 5, 5, 5], &[3, 3, 3, 3, 3]),
                raw_round(3, "Round 3", &[1, 1, 1, 1, 1], &[3, 3, 3, 3, 3]),
            ],
        );
        let valid = classify_match(&raw, 1).unwrap();
        let summary = valid.summary().unwrap();

        assert_eq!(summary.outcome, MatchOutcome::Win);
        assert_eq!(summary.total, 55);
        assert_eq!(summary.stats.hatchet.round_count, 3);

        let forfeit = Match::tagged(2, 1, 2, MatchState::Forfeit);
        assert!(forfeit.summary().is_none());
    }
}
