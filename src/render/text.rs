use crate::analysis::{Match, MatchState, Throw};

/// One compact line per match: `profile match outcome total` followed by
/// each round's outcome letter and its throws, a missed clutch shown as `C`
pub fn match_text(m: &Match) -> String {
    let status = match m.state {
        MatchState::Valid => None,
        MatchState::Invalid => Some("INVALID"),
        MatchState::Forfeit => Some("FORFEIT"),
        MatchState::Unresolved => Some("UNRESOLVED"),
        MatchState::Unprocessed => Some("PENDING"),
    };
    if let Some(status) = status {
        return format!("{} {} {}", m.profile_id, m.match_id, status);
    }

    let mut parts = vec![
        m.profile_id.to_string(),
        m.match_id.to_string(),
        m.outcome.map(|o| o.letter().to_string()).unwrap_or_default(),
        m.total.to_string(),
    ];
    for round in &m.rounds {
        parts.push(round.outcome.letter().to_string());
        parts.push(round.throws.iter().map(throw_text).collect());
    }
    parts.join(" ")
}

fn throw_text(throw: &Throw) -> String {
    if throw.is_clutch && throw.score == 0 {
        "C".to_string()
    } else {
        throw.score.to_string()
    }
}
