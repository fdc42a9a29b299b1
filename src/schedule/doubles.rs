use std::collections::HashSet;
use rand::Rng;

use crate::error::ScheduleError;
use super::ledger::{order_by_play_count, pick_rested, real_ids, PairingLedger, PlayCounts};
use super::types::{Gender, Match, Player, PlayerId, Schedule};

/// Index splits of four selected players into two teams
const SPLITS: [((usize, usize), (usize, usize)); 3] = [
    ((0, 1), (2, 3)),
    ((0, 2), (1, 3)),
    ((0, 3), (1, 2)),
];

/// Builds `total_matches` doubles matches using only players of `gender`
/// (byes of that gender included), preferring teams that have rarely played
/// together.
pub fn generate_doubles<R>(
    players: &[Player],
    total_matches: usize,
    gender: Gender,
    rng: &mut R,
) -> Result<Schedule, ScheduleError>
where
    R: Rng + ?Sized,
{
    let pool: Vec<&Player> = players.iter().filter(|p| p.gender == gender).collect();
    if pool.len() < 4 {
        return Err(ScheduleError::InsufficientPlayers {
            gender: Some(gender),
            required: 4,
            available: pool.len(),
        });
    }

    let mut counts = PlayCounts::new();
    let mut ledger = PairingLedger::new();
    let mut previous: HashSet<PlayerId> = HashSet::new();
    let mut matches = Vec::with_capacity(total_matches);

    for _ in 0..total_matches {
        let ordered = order_by_play_count(&pool, &counts, rng);
        let selected = pick_rested(&ordered, &previous, 4);

        let ((a1, a2), (b1, b2)) = cheapest_split(&selected, &ledger);
        let team_a = (selected[a1], selected[a2]);
        let team_b = (selected[b1], selected[b2]);

        ledger.record(team_a.0, team_a.1);
        ledger.record(team_b.0, team_b.1);
        counts.record_all(selected.iter().copied());
        previous = real_ids(selected.iter().copied());

        matches.push(Match::Doubles {
            team_a: (team_a.0.clone(), team_a.1.clone()),
            team_b: (team_b.0.clone(), team_b.1.clone()),
        });
    }

    Ok(matches)
}

/// First split with the lowest combined pairing cost
fn cheapest_split(selected: &[&Player], ledger: &PairingLedger) -> ((usize, usize), (usize, usize)) {
    let mut best = SPLITS[0];
    let mut best_cost = u32::MAX;

    for split in SPLITS {
        let ((a1, a2), (b1, b2)) = split;
        let cost = ledger.cost(selected[a1], selected[a2]) + ledger.cost(selected[b1], selected[b2]);
        if cost < best_cost {
            best_cost = cost;
            best = split;
        }
    }

    best
}
