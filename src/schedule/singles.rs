use std::collections::HashSet;
use rand::Rng;

use crate::error::ScheduleError;
use super::ledger::{order_by_play_count, pick_rested, real_ids, PlayCounts};
use super::types::{Match, Player, PlayerId, Schedule};

/// Builds `total_matches` singles matches, least-played players first
pub fn generate_singles<R>(players: &[Player], total_matches: usize, rng: &mut R) -> Result<Schedule, ScheduleError>
where
    R: Rng + ?Sized,
{
    if players.len() < 2 {
        return Err(ScheduleError::InsufficientPlayers {
            gender: None,
            required: 2,
            available: players.len(),
        });
    }

    let pool: Vec<&Player> = players.iter().collect();
    let mut counts = PlayCounts::new();
    let mut previous: HashSet<PlayerId> = HashSet::new();
    let mut matches = Vec::with_capacity(total_matches);

    for _ in 0..total_matches {
        let ordered = order_by_play_count(&pool, &counts, rng);
        let chosen = pick_rested(&ordered, &previous, 2);

        counts.record_all(chosen.iter().copied());
        previous = real_ids(chosen.iter().copied());
        matches.push(Match::Singles {
            a: chosen[0].clone(),
            b: chosen[1].clone(),
        });
    }

    Ok(matches)
}
