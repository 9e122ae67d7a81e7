use thiserror::Error;

use super::types::{
    Category, Match, MatchId, MatchOutcome, MatchState, ProfileId, Round, RoundOutcome, Throw,
    MAX_ROUND_COUNT, TIE_BREAK_ROUND_NAME,
};
use crate::domain::{AxeResponse, GameResponse, MatchResponse, RoundResponse};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("match {match_id} is malformed: {reason}")]
    Malformed { match_id: MatchId, reason: String },
    #[error("match {match_id} has no deciding round for profile {profile_id}")]
    Unresolved {
        match_id: MatchId,
        profile_id: ProfileId,
    },
}

impl MatchError {
    /// State a match row is stored with when classification fails
    pub fn state(&self) -> MatchState {
        match self {
            MatchError::Malformed { .. } => MatchState::Invalid,
            MatchError::Unresolved { .. } => MatchState::Unresolved,
        }
    }

    fn malformed(match_id: MatchId, reason: impl Into<String>) -> Self {
        MatchError::Malformed {
            match_id,
            reason: reason.into(),
        }
    }
}

pub fn classify_round(subject_total: u32, opponent_total: u32) -> RoundOutcome {
    use std::cmp::Ordering;

    match subject_total.cmp(&opponent_total) {
        Ordering::Greater => RoundOutcome::Win,
        Ordering::Less => RoundOutcome::Loss,
        Ordering::Equal => RoundOutcome::Tie,
    }
}

/// Classifies a raw match from one participant's point of view.
///
/// Invalid (too many rounds) and forfeited matches come back as `Ok` with the
/// matching state and no outcome. A malformed payload or a match without a
/// deciding round comes back as `Err`.
pub fn classify_match(raw: &MatchResponse, profile_id: ProfileId) -> Result<Match, MatchError> {
    if raw.rounds.len() > MAX_ROUND_COUNT {
        let opponent_id = raw.opponent_of(profile_id).map(|p| p.id).unwrap_or(0);
        return Ok(Match::tagged(raw.id, profile_id, opponent_id, MatchState::Invalid));
    }

    let opponent_id = raw
        .opponent_of(profile_id)
        .map(|p| p.id)
        .ok_or_else(|| MatchError::malformed(raw.id, "no opponent entry"))?;

    let subject = raw.player(profile_id).ok_or_else(|| {
        MatchError::malformed(raw.id, format!("profile {} did not play", profile_id))
    })?;

    if subject.has_forfeited() {
        return Ok(Match::tagged(raw.id, profile_id, opponent_id, MatchState::Forfeit));
    }

    let rounds = build_rounds(raw, profile_id)?;
    let total = rounds
        .iter()
        .filter(|r| !r.is_big_axe())
        .map(|r| r.total)
        .sum();
    let outcome = decide_outcome(&rounds).ok_or(MatchError::Unresolved {
        match_id: raw.id,
        profile_id,
    })?;

    Ok(Match {
        match_id: raw.id,
        profile_id,
        opponent_id,
        state: MatchState::Valid,
        outcome: Some(outcome),
        total,
        rounds,
    })
}

/// Like [`classify_match`], but folds errors into a tagged match record.
pub fn classify_or_tag(raw: &MatchResponse, profile_id: ProfileId) -> (Match, Option<MatchError>) {
    match classify_match(raw, profile_id) {
        Ok(m) => (m, None),
        Err(e) => {
            let opponent_id = raw.opponent_of(profile_id).map(|p| p.id).unwrap_or(0);
            (Match::tagged(raw.id, profile_id, opponent_id, e.state()), Some(e))
        }
    }
}

fn build_rounds(raw: &MatchResponse, profile_id: ProfileId) -> Result<Vec<Round>, MatchError> {
    let mut ordered: Vec<&RoundResponse> = raw.rounds.iter().collect();
    ordered.sort_by_key(|r| r.order);

    if ordered.iter().filter(|r| is_tie_break(r)).count() > 1 {
        return Err(MatchError::malformed(raw.id, "more than one tie break round"));
    }

    ordered
        .into_iter()
        .map(|r| build_round(raw.id, r, profile_id))
        .collect()
}

fn build_round(
    match_id: MatchId,
    raw: &RoundResponse,
    profile_id: ProfileId,
) -> Result<Round, MatchError> {
    let own = raw.game_of(profile_id).ok_or_else(|| {
        MatchError::malformed(match_id, format!("round {} has no game for the profile", raw.order))
    })?;
    let opponent = raw.game_against(profile_id).ok_or_else(|| {
        MatchError::malformed(match_id, format!("round {} has no opponent game", raw.order))
    })?;

    Ok(Round {
        category: Category::from_tie_break(is_tie_break(raw)),
        outcome: classify_round(own.score, opponent.score),
        total: own.score,
        opponent_total: opponent.score,
        throws: map_throws(own),
        opponent_throws: map_throws(opponent),
    })
}

fn is_tie_break(raw: &RoundResponse) -> bool {
    raw.name == TIE_BREAK_ROUND_NAME
}

fn map_throws(game: &GameResponse) -> Vec<Throw> {
    let mut axes: Vec<&AxeResponse> = game.axes.iter().collect();
    axes.sort_by_key(|a| a.order);
    axes.into_iter()
        .map(|a| Throw {
            score: a.score,
            is_clutch: a.clutch_called,
        })
        .collect()
}

#[derive(Default)]
struct Tally {
    win: u32,
    loss: u32,
}

fn decide_outcome(rounds: &[Round]) -> Option<MatchOutcome> {
    let mut hatchet = Tally::default();
    let mut big_axe = Tally::default();

    for round in rounds {
        let tally = if round.is_big_axe() { &mut big_axe } else { &mut hatchet };
        match round.outcome {
            RoundOutcome::Win => tally.win += 1,
            RoundOutcome::Loss => tally.loss += 1,
            RoundOutcome::Tie => {}
        }
    }

    if hatchet.win > hatchet.loss {
        Some(MatchOutcome::Win)
    } else if big_axe.win > big_axe.loss {
        Some(MatchOutcome::Win)
    } else if hatchet.loss > hatchet.win {
        Some(MatchOutcome::Loss)
    } else if big_axe.loss > big_axe.win {
        Some(MatchOutcome::OvertimeLoss)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::{raw_match, raw_round};

    #[test]
    fn test_round_classification_is_total_and_antisymmetric() {
        for a in 0..=30 {
            for b in 0..=30 {
                let forward = classify_round(a, b);
                let backward = classify_round(b, a);
                assert_eq!(forward == RoundOutcome::Tie, a == b);
                assert_eq!(forward == RoundOutcome::Win, backward == RoundOutcome::Loss);
            }
        }
    }

    #[test]
    fn test_win_on_hatchet_rounds() {
        let raw = raw_match(
            10,
            vec![
                raw_round(1, "Round 1", &[5, 5, 5, 5, 5], &[4, 4, 4, 4, 4]),
                raw_round(2, "Round 2", &[3, 3, 3, 3, 3], &[5, 5, 5, 5, 5]),
                raw_round(3, "Round 3", &[5, 5, 5, 5, 3], &[1, 1, 1, 1, 1]),
            ],
        );

        let m = classify_match(&raw, 1).unwrap();

        assert_eq!(m.state, MatchState::Valid);
        assert_eq!(m.outcome, Some(MatchOutcome::Win));
        assert_eq!(m.total, 25 + 15 + 23);
        assert_eq!(m.opponent_id, 2);
        assert_eq!(m.rounds.len(), 3);
    }

    #[test]
    fn test_tie_break_decides_and_is_excluded_from_total() {
        let raw = raw_match(
            11,
            vec![
                raw_round(4, "Tie Break", &[5], &[3]),
                raw_round(1, "Round 1", &[5, 5, 5, 5, 5], &[1, 1, 1, 1, 1]),
                raw_round(2, "Round 2", &[1, 1, 1, 1, 1], &[5, 5, 5, 5, 5]),
                raw_round(3, "Round 3", &[3, 3, 3, 3, 3], &[3, 3, 3, 3, 3]),
            ],
        );

        let m = classify_match(&raw, 1).unwrap();

        assert_eq!(m.outcome, Some(MatchOutcome::Win));
        assert_eq!(m.total, 25 + 5 + 15);
        assert!(m.rounds.last().unwrap().is_big_axe());
        assert_eq!(m.rounds[0].outcome, RoundOutcome::Win);
    }

    #[test]
    fn test_tie_break_overrides_hatchet_deficit() {
        let raw = raw_match(
            12,
            vec![
                raw_round(1, "Round 1", &[5, 5, 5, 5, 5], &[1, 1, 1, 1, 1]),
                raw_round(2, "Round 2", &[1, 1, 1, 1, 1], &[5, 5, 5, 5, 5]),
                raw_round(3, "Round 3", &[1, 1, 1, 1, 1], &[3, 3, 3, 3, 3]),
                raw_round(4, "Tie Break", &[5], &[0]),
            ],
        );

        let m = classify_match(&raw, 1).unwrap();

        assert_eq!(m.outcome, Some(MatchOutcome::Win));
        assert_eq!(m.total, 25 + 5 + 5);
    }

    #[test]
    fn test_overtime_loss() {
        let raw = raw_match(
            13,
            vec![
                raw_round(1, "Round 1", &[5, 5, 5, 5, 5], &[1, 1, 1, 1, 1]),
                raw_round(2, "Round 2", &[1, 1, 1, 1, 1], &[5, 5, 5, 5, 5]),
                raw_round(3, "Round 3", &[3, 3, 3, 3, 3], &[3, 3, 3, 3, 3]),
                raw_round(4, "Tie Break", &[0], &[5]),
            ],
        );

        let m = classify_match(&raw, 1).unwrap();
        assert_eq!(m.outcome, Some(MatchOutcome::OvertimeLoss));

        let other_side = classify_match(&raw, 2).unwrap();
        assert_eq!(other_side.outcome, Some(MatchOutcome::Win));
    }

    #[test]
    fn test_even_hatchet_rounds_without_tie_break_is_unresolved() {
        let raw = raw_match(
            14,
            vec![
                raw_round(1, "Round 1", &[5, 5, 5, 5, 5], &[1, 1, 1, 1, 1]),
                raw_round(2, "Round 2", &[1, 1, 1, 1, 1], &[5, 5, 5, 5, 5]),
                raw_round(3, "Round 3", &[3, 3, 3, 3, 3], &[3, 3, 3, 3, 3]),
            ],
        );

        let err = classify_match(&raw, 1).unwrap_err();
        assert_eq!(
            err,
            MatchError::Unresolved {
                match_id: 14,
                profile_id: 1
            }
        );

        let (tagged, error) = classify_or_tag(&raw, 1);
        assert_eq!(tagged.state, MatchState::Unresolved);
        assert_eq!(tagged.outcome, None);
        assert_eq!(tagged.total, 0);
        assert!(error.is_some());
    }

    #[test]
    fn test_too_many_rounds_is_invalid() {
        let rounds = (1..=5)
            .map(|i| raw_round(i, "Round", &[5], &[3]))
            .collect();
        let raw = raw_match(15, rounds);

        let m = classify_match(&raw, 1).unwrap();

        assert_eq!(m.state, MatchState::Invalid);
        assert_eq!(m.outcome, None);
        assert_eq!(m.total, 0);
        assert!(m.rounds.is_empty());
    }

    #[test]
    fn test_forfeit_stops_classification() {
        let mut raw = raw_match(16, vec![raw_round(1, "Round 1", &[5], &[3])]);
        raw.players[0].forfeit = Some(true);

        let m = classify_match(&raw, 1).unwrap();

        assert_eq!(m.state, MatchState::Forfeit);
        assert_eq!(m.outcome, None);
        assert_eq!(m.total, 0);
    }

    #[test]
    fn test_missing_opponent_game_is_malformed() {
        let mut raw = raw_match(17, vec![raw_round(1, "Round 1", &[5], &[3])]);
        raw.rounds[0].games.retain(|g| g.player == 1);

        let err = classify_match(&raw, 1).unwrap_err();

        assert!(matches!(err, MatchError::Malformed { match_id: 17, .. }));
        assert_eq!(err.state(), MatchState::Invalid);
    }

    #[test]
    fn test_missing_opponent_player_is_invalid() {
        let mut raw = raw_match(
            19,
            vec![
                raw_round(1, "Round 1", &[5, 5, 5, 5, 5], &[3, 3, 3, 3, 3]),
                raw_round(2, "Round 2", &[5, 5, 5, 5, 5], &[3, 3, 3, 3, 3]),
                raw_round(3, "Round 3", &[5, 5, 5, 5, 5], &[3, 3, 3, 3, 3]),
            ],
        );
        raw.players.retain(|p| p.id == 1);

        let (tagged, error) = classify_or_tag(&raw, 1);

        assert!(matches!(error, Some(MatchError::Malformed { match_id: 19, .. })));
        assert_eq!(tagged.state, MatchState::Invalid);
        assert_eq!(tagged.outcome, None);
        assert_eq!(tagged.opponent_id, 0);
        assert!(tagged.rounds.is_empty());
    }

    #[test]
    fn test_throws_follow_axe_order() {
        let mut raw = raw_match(18, vec![raw_round(1, "Round 1", &[5, 3, 1], &[0, 0, 0])]);
        raw.rounds[0].games[0].axes.reverse();

        let m = classify_match(&raw, 1).unwrap();
        let scores: Vec<u32> = m.rounds[0].throws.iter().map(|t| t.score).collect();

        assert_eq!(scores, vec![5, 3, 1]);
    }
}
