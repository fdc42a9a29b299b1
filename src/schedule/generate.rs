use std::collections::HashSet;
use rand::Rng;
use tracing::{info, warn};

use crate::error::ScheduleError;
use super::balance::{balance_schedule, Balanced};
use super::doubles::generate_doubles;
use super::mixed::generate_mixed;
use super::roster::normalize_roster;
use super::singles::generate_singles;
use super::types::{Gender, Mode, Player, Schedule};

/// Normalizes the roster, picks the generator for `mode` and keeps the most
/// even of up to `trials` attempts.
pub fn generate_schedule<R>(
    mode: Mode,
    players: &[Player],
    total_matches: usize,
    trials: usize,
    rng: &mut R,
) -> Result<Schedule, ScheduleError>
where
    R: Rng + ?Sized,
{
    generate_balanced(mode, players, total_matches, trials, rng).map(|balanced| balanced.schedule)
}

/// Same as [`generate_schedule`] but keeps the balancer's bookkeeping
pub fn generate_balanced<R>(
    mode: Mode,
    players: &[Player],
    total_matches: usize,
    trials: usize,
    rng: &mut R,
) -> Result<Balanced, ScheduleError>
where
    R: Rng + ?Sized,
{
    check_unique_ids(players)?;
    let roster = normalize_roster(players, mode);

    if total_matches == 0 {
        return Ok(Balanced {
            schedule: Vec::new(),
            spread: 0,
            trials_run: 0,
            history: Vec::new(),
        });
    }

    info!(mode = mode.label(), players = roster.len(), total_matches, trials, "generating schedule");

    let result = match mode {
        Mode::Singles => balance_schedule(
            |p: &[Player], n: usize, rng: &mut R| generate_singles(p, n, rng),
            &roster, total_matches, mode, trials, rng,
        ),
        Mode::MaleDoubles => balance_schedule(
            |p: &[Player], n: usize, rng: &mut R| generate_doubles(p, n, Gender::Male, rng),
            &roster, total_matches, mode, trials, rng,
        ),
        Mode::FemaleDoubles => balance_schedule(
            |p: &[Player], n: usize, rng: &mut R| generate_doubles(p, n, Gender::Female, rng),
            &roster, total_matches, mode, trials, rng,
        ),
        Mode::MixedDoubles => balance_schedule(
            |p: &[Player], n: usize, rng: &mut R| generate_mixed(p, n, rng),
            &roster, total_matches, mode, trials, rng,
        ),
    };

    match &result {
        Ok(balanced) => info!(spread = balanced.spread, trials_run = balanced.trials_run, "schedule ready"),
        Err(e) => warn!(error = %e, "schedule generation failed"),
    }
    result
}

fn check_unique_ids(players: &[Player]) -> Result<(), ScheduleError> {
    let mut seen = HashSet::new();
    for p in players {
        if !seen.insert(p.id) {
            return Err(ScheduleError::DuplicatePlayerId(p.id));
        }
    }
    Ok(())
}
