use std::collections::BTreeMap;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::ScheduleError;
use super::types::{Match, Mode, Player, PlayerId, Schedule};

pub const DEFAULT_TRIALS: usize = 20;

/// Best schedule found by [`balance_schedule`]
#[derive(Debug, Clone, Serialize)]
pub struct Balanced {
    pub schedule: Schedule,
    /// Max minus min matches per player in `schedule`
    pub spread: u32,
    pub trials_run: usize,
    /// Spread kept after each trial
    pub history: Vec<u32>,
}

/// Runs `generate` up to `trials` times and keeps the schedule whose match
/// counts are most even. Stops early on a perfectly even schedule. Errors from
/// the generator end the search and are returned as-is.
pub fn balance_schedule<R, G>(
    mut generate: G,
    players: &[Player],
    total_matches: usize,
    mode: Mode,
    trials: usize,
    rng: &mut R,
) -> Result<Balanced, ScheduleError>
where
    R: Rng + ?Sized,
    G: FnMut(&[Player], usize, &mut R) -> Result<Schedule, ScheduleError>,
{
    let trials = trials.max(1);
    let mut best: Option<(Schedule, u32)> = None;
    let mut history = Vec::with_capacity(trials);

    for trial in 0..trials {
        let schedule = generate(players, total_matches, rng)?;
        let trial_spread = spread(&compute_match_counts(&schedule, mode, players));
        debug!(trial, spread = trial_spread, "trial finished");

        let improved = best.as_ref().map(|(_, kept)| trial_spread < *kept).unwrap_or(true);
        if improved {
            best = Some((schedule, trial_spread));
        }

        let kept = best.as_ref().map(|(_, s)| *s).unwrap_or(trial_spread);
        history.push(kept);
        if kept == 0 {
            debug!(trial, "even schedule found, stopping early");
            break;
        }
    }

    let trials_run = history.len();
    let (schedule, spread) = best.unwrap_or_default();
    Ok(Balanced {
        schedule,
        spread,
        trials_run,
        history,
    })
}

/// Matches per real player, byes excluded. Every real player on the roster
/// gets an entry, so the other gender shows up with 0 in same-gender doubles.
pub fn compute_match_counts(schedule: &[Match], _mode: Mode, players: &[Player]) -> BTreeMap<PlayerId, u32> {
    let mut counts: BTreeMap<PlayerId, u32> = players
        .iter()
        .filter(|p| p.is_real())
        .map(|p| (p.id, 0))
        .collect();

    for m in schedule {
        for p in m.players() {
            if let Some(count) = counts.get_mut(&p.id) {
                *count += 1;
            }
        }
    }

    counts
}

/// Max minus min of the counts, 0 when there are none
pub fn spread(counts: &BTreeMap<PlayerId, u32>) -> u32 {
    let max = counts.values().max().copied().unwrap_or(0);
    let min = counts.values().min().copied().unwrap_or(0);
    max - min
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::schedule::{generate_doubles, generate_singles, Gender};

    fn roster(n: u32) -> Vec<Player> {
        (0..n).map(|i| Player::new(i, format!("P{}", i + 1), Gender::Female)).collect()
    }

    fn singles(a: &Player, b: &Player) -> Match {
        Match::Singles { a: a.clone(), b: b.clone() }
    }

    #[test]
    fn counts_skip_byes_and_keep_idle_players() {
        let mut players = roster(3);
        players.push(Player::placeholder(3, Gender::Neutral));
        let schedule = vec![singles(&players[0], &players[3]), singles(&players[0], &players[1])];
        let counts = compute_match_counts(&schedule, Mode::Singles, &players);
        assert_eq!(counts, BTreeMap::from([(0, 2), (1, 1), (2, 0)]));
        assert_eq!(spread(&counts), 2);
    }

    #[test]
    fn counts_for_gender_doubles_keep_other_gender_at_zero() {
        let mut players: Vec<Player> = (0..5).map(|i| Player::new(i, format!("M{i}"), Gender::Male)).collect();
        players.extend((5..8).map(|i| Player::new(i, format!("F{i}"), Gender::Female)));
        players.push(Player::placeholder(8, Gender::Male));

        let schedule = vec![Match::Doubles {
            team_a: (players[0].clone(), players[1].clone()),
            team_b: (players[2].clone(), players[8].clone()),
        }];
        let counts = compute_match_counts(&schedule, Mode::MaleDoubles, &players);
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(counts[&0], 1);
        assert_eq!(counts[&5], 0);
        assert_eq!(counts[&7], 0);
        assert_eq!(spread(&counts), 1);
    }

    #[test]
    fn gender_doubles_spread_includes_idle_gender() {
        let players = vec![
            Player::new(0, "A", Gender::Male),
            Player::new(1, "B", Gender::Male),
            Player::new(2, "C", Gender::Male),
            Player::new(3, "D", Gender::Male),
            Player::new(4, "E", Gender::Female),
        ];
        let result = balance_schedule(
            |p: &[Player], n: usize, rng: &mut StdRng| generate_doubles(p, n, Gender::Male, rng),
            &players,
            2,
            Mode::MaleDoubles,
            5,
            &mut StdRng::seed_from_u64(35),
        )
        .unwrap();
        // Every man plays both matches, the woman none
        assert_eq!(result.spread, 2);
        assert_eq!(result.trials_run, 5);
    }

    #[test]
    fn spread_of_nothing_is_zero() {
        assert_eq!(spread(&BTreeMap::new()), 0);
    }

    #[test]
    fn stops_on_first_even_schedule() {
        let players = roster(4);
        let mut calls = 0;
        let result = balance_schedule(
            |p: &[Player], _n: usize, _rng: &mut StdRng| {
                calls += 1;
                Ok(vec![singles(&p[0], &p[1]), singles(&p[2], &p[3])])
            },
            &players,
            2,
            Mode::Singles,
            20,
            &mut StdRng::seed_from_u64(31),
        )
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(result.spread, 0);
        assert_eq!(result.trials_run, 1);
    }

    #[test]
    fn keeps_lowest_spread_across_trials() {
        let players = roster(4);
        let mut trial = 0;
        let result = balance_schedule(
            |p: &[Player], _n: usize, _rng: &mut StdRng| {
                trial += 1;
                // Trial 2 is the most even; trial 3 is worse again
                let schedule = match trial {
                    1 => vec![singles(&p[0], &p[1]), singles(&p[0], &p[1]), singles(&p[0], &p[2])],
                    2 => vec![singles(&p[0], &p[1]), singles(&p[2], &p[3]), singles(&p[0], &p[2])],
                    _ => vec![singles(&p[0], &p[1]), singles(&p[0], &p[1]), singles(&p[0], &p[1])],
                };
                Ok(schedule)
            },
            &players,
            3,
            Mode::Singles,
            3,
            &mut StdRng::seed_from_u64(32),
        )
        .unwrap();
        assert_eq!(result.trials_run, 3);
        assert_eq!(result.spread, 1);
        assert_eq!(result.history, vec![3, 1, 1]);
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn generator_error_aborts() {
        let players = roster(1);
        let result = balance_schedule(
            |p: &[Player], n: usize, rng: &mut StdRng| generate_singles(p, n, rng),
            &players,
            3,
            Mode::Singles,
            20,
            &mut StdRng::seed_from_u64(33),
        );
        assert!(matches!(result, Err(ScheduleError::InsufficientPlayers { .. })));
    }

    #[test]
    fn zero_trials_still_runs_once() {
        let players = roster(2);
        let result = balance_schedule(
            |p: &[Player], n: usize, rng: &mut StdRng| generate_singles(p, n, rng),
            &players,
            1,
            Mode::Singles,
            0,
            &mut StdRng::seed_from_u64(34),
        )
        .unwrap();
        assert_eq!(result.trials_run, 1);
        assert_eq!(result.schedule.len(), 1);
    }
}
