use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::ScheduleError;
use super::doubles::generate_doubles;
use super::ledger::{order_by_play_count, PlayCounts};
use super::roster::count_real_gender;
use super::types::{Gender, Match, Player, Schedule};

/// Mixed doubles for a session.
///
/// With equal numbers of men and women every match is mixed. Otherwise only a
/// share of the matches proportional to the smaller group is mixed and the
/// rest are same-gender doubles for the larger group, shuffled together.
pub fn generate_mixed<R>(players: &[Player], total_matches: usize, rng: &mut R) -> Result<Schedule, ScheduleError>
where
    R: Rng + ?Sized,
{
    let males = count_real_gender(players, Gender::Male);
    let females = count_real_gender(players, Gender::Female);

    if males == females {
        return generate_mixed_regular(players, total_matches, rng);
    }

    let majority = if males > females { Gender::Male } else { Gender::Female };
    let mixed_count = mixed_allocation(males, females, total_matches);
    let same_count = total_matches - mixed_count;
    debug!(males, females, mixed_count, same_count, %majority, "splitting mixed session");

    let mut matches = if mixed_count > 0 {
        generate_mixed_regular(players, mixed_count, rng)?
    } else {
        Vec::new()
    };
    if same_count > 0 {
        matches.extend(generate_doubles(players, same_count, majority, rng)?);
    }
    matches.shuffle(rng);

    Ok(matches)
}

/// Number of truly mixed matches out of `total_matches` when the genders are
/// unbalanced: `round(2 * minority * total / (males + females))`, rounding
/// halves to even, never above `total_matches`.
pub fn mixed_allocation(males: usize, females: usize, total_matches: usize) -> usize {
    let sum = males + females;
    if sum == 0 {
        return 0;
    }
    let numerator = 2 * males.min(females) * total_matches;
    let quotient = numerator / sum;
    let twice_remainder = 2 * (numerator % sum);

    let rounded = if twice_remainder > sum || (twice_remainder == sum && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded.min(total_matches)
}

/// Builds mixed matches from the whole roster, partnering each man with a
/// woman whenever the least-played players allow it.
pub fn generate_mixed_regular<R>(players: &[Player], total_matches: usize, rng: &mut R) -> Result<Schedule, ScheduleError>
where
    R: Rng + ?Sized,
{
    if players.len() < 4 {
        return Err(ScheduleError::InsufficientPlayers {
            gender: None,
            required: 4,
            available: players.len(),
        });
    }

    let pool: Vec<&Player> = players.iter().collect();
    let mut counts = PlayCounts::new();
    let mut matches = Vec::with_capacity(total_matches);

    for _ in 0..total_matches {
        let ordered = order_by_play_count(&pool, &counts, rng);
        let selected = most_balanced_four(&ordered);

        let men: Vec<&Player> = selected.iter().copied().filter(|p| p.gender == Gender::Male).collect();
        let women: Vec<&Player> = selected.iter().copied().filter(|p| p.gender == Gender::Female).collect();

        let (team_a, team_b) = if men.len() == 2 && women.len() == 2 {
            if rng.gen_bool(0.5) {
                ((men[0], women[0]), (men[1], women[1]))
            } else {
                ((men[0], women[1]), (men[1], women[0]))
            }
        } else {
            // Pool cannot give a 2/2 split; pair by position
            ((selected[0], selected[1]), (selected[2], selected[3]))
        };

        counts.record_all(selected.iter().copied());
        matches.push(Match::Doubles {
            team_a: (team_a.0.clone(), team_a.1.clone()),
            team_b: (team_b.0.clone(), team_b.1.clone()),
        });
    }

    Ok(matches)
}

/// First four-player combination, in order, with the smallest gap between
/// men and everyone else. Stops at the first even split.
fn most_balanced_four<'a>(ordered: &[&'a Player]) -> [&'a Player; 4] {
    let n = ordered.len();
    let mut best = [ordered[0], ordered[1], ordered[2], ordered[3]];
    let mut best_diff = usize::MAX;

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                for l in k + 1..n {
                    let combo = [ordered[i], ordered[j], ordered[k], ordered[l]];
                    let men = combo.iter().filter(|p| p.gender == Gender::Male).count();
                    let diff = men.abs_diff(4 - men);
                    if diff < best_diff {
                        best_diff = diff;
                        best = combo;
                    }
                    if best_diff == 0 {
                        return best;
                    }
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::schedule::PlayerId;

    fn roster(males: u32, females: u32) -> Vec<Player> {
        let mut players = Vec::new();
        for i in 0..males {
            players.push(Player::new(i, format!("M{}", i + 1), Gender::Male));
        }
        for i in 0..females {
            players.push(Player::new(males + i, format!("F{}", i + 1), Gender::Female));
        }
        players
    }

    #[test]
    fn allocation_examples() {
        assert_eq!(mixed_allocation(6, 2, 10), 5);
        assert_eq!(mixed_allocation(2, 6, 10), 5);
        assert_eq!(mixed_allocation(4, 2, 18), 12);
        assert_eq!(mixed_allocation(5, 0, 12), 0);
        assert_eq!(mixed_allocation(0, 0, 12), 0);
    }

    #[test]
    fn allocation_rounds_half_to_even() {
        // 2 * 1 * 5 / 4 = 2.5 -> 2, and 2 * 1 * 3 / 4 = 1.5 -> 2
        assert_eq!(mixed_allocation(3, 1, 5), 2);
        assert_eq!(mixed_allocation(3, 1, 3), 2);
    }

    #[test]
    fn allocation_stays_in_bounds() {
        for males in 0..8 {
            for females in 0..8 {
                for total in 0..25 {
                    assert!(mixed_allocation(males, females, total) <= total);
                }
            }
        }
    }

    #[test]
    fn balanced_roster_yields_cross_gender_teams() {
        let mut rng = StdRng::seed_from_u64(21);
        let matches = generate_mixed(&roster(4, 4), 12, &mut rng).unwrap();
        assert_eq!(matches.len(), 12);
        for m in &matches {
            if let Match::Doubles { team_a, team_b } = m {
                assert_ne!(team_a.0.gender, team_a.1.gender);
                assert_ne!(team_b.0.gender, team_b.1.gender);
            } else {
                panic!("expected doubles");
            }
        }
    }

    #[test]
    fn unbalanced_roster_adds_majority_doubles() {
        let mut rng = StdRng::seed_from_u64(22);
        let matches = generate_mixed(&roster(6, 2), 10, &mut rng).unwrap();
        assert_eq!(matches.len(), 10);
        let all_male = matches
            .iter()
            .filter(|m| m.players().iter().all(|p| p.gender == Gender::Male))
            .count();
        assert_eq!(all_male, 10 - mixed_allocation(6, 2, 10));
    }

    #[test]
    fn unbalanced_roster_without_enough_majority_fails() {
        // 3 men and 1 woman: men need a bye to reach four
        let mut rng = StdRng::seed_from_u64(23);
        let err = generate_mixed(&roster(3, 1), 4, &mut rng).unwrap_err();
        assert!(matches!(err, ScheduleError::InsufficientPlayers { gender: Some(Gender::Male), .. }));
    }

    #[test]
    fn positional_fallback_without_women() {
        let mut rng = StdRng::seed_from_u64(24);
        let matches = generate_mixed_regular(&roster(4, 0), 2, &mut rng).unwrap();
        for m in &matches {
            let ids: HashSet<PlayerId> = m.players().iter().map(|p| p.id).collect();
            assert_eq!(ids.len(), 4);
        }
    }

    #[test]
    fn most_balanced_four_stops_at_first_even_split() {
        let players = roster(3, 2);
        let refs: Vec<&Player> = players.iter().collect();
        let picked: Vec<PlayerId> = most_balanced_four(&refs).iter().map(|p| p.id).collect();
        // M0 M1 M2 F3 F4: first 2/2 combination in order is M0 M1 F3 F4
        assert_eq!(picked, vec![0, 1, 3, 4]);
    }

    #[test]
    fn regular_needs_four_players() {
        let mut rng = StdRng::seed_from_u64(25);
        assert!(generate_mixed_regular(&roster(2, 1), 1, &mut rng).is_err());
    }
}
