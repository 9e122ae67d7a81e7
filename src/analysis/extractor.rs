use super::types::{CategoryCounters, MatchStatistics, Round, RoundOutcome, Throw};

/// Per-category counters for one match's rounds
pub fn extract_match_statistics(rounds: &[Round]) -> MatchStatistics {
    let mut stats = MatchStatistics::default();

    for round in rounds {
        record_round(&mut stats[round.category], round);
    }

    stats
}

fn record_round(counters: &mut CategoryCounters, round: &Round) {
    match round.outcome {
        RoundOutcome::Win => counters.round_win += 1,
        RoundOutcome::Loss => counters.round_loss += 1,
        RoundOutcome::Tie => counters.round_tie += 1,
    }

    counters.round_count += 1;
    counters.total_score += round.total;

    for throw in &round.throws {
        record_throw(counters, throw);
    }
}

fn record_throw(counters: &mut CategoryCounters, throw: &Throw) {
    if throw.is_clutch {
        counters.clutch.call += 1;
        counters.clutch.total_score += throw.score;
        if throw.is_clutch_hit() {
            counters.clutch.hit += 1;
        }
        return;
    }

    let target = &mut counters.target;
    match throw.score {
        5 => target.five += 1,
        3 => target.three += 1,
        1 => target.one += 1,
        0 => target.drop += 1,
        _ => {}
    }
    target.total_score += throw.score;
    target.throw_count += 1;
}
