use tracing::debug;

use super::types::{Gender, Mode, Player, PlayerId};

/// Pads the roster with byes so the mode's grouping constraint holds.
///
/// Singles needs an even roster, same-gender doubles an even count of that
/// gender, and mixed doubles an even count of each gender plus an even total.
/// Running it on an already normalized roster adds nothing.
pub fn normalize_roster(players: &[Player], mode: Mode) -> Vec<Player> {
    let mut roster = players.to_vec();

    match mode {
        Mode::Singles => pad_total(&mut roster),
        Mode::MaleDoubles => pad_gender(&mut roster, Gender::Male),
        Mode::FemaleDoubles => pad_gender(&mut roster, Gender::Female),
        Mode::MixedDoubles => {
            // Per-gender first: with both genders even the total is only odd
            // if a neutral bye is already present.
            pad_gender(&mut roster, Gender::Male);
            pad_gender(&mut roster, Gender::Female);
            pad_total(&mut roster);
        }
    }

    roster
}

/// Count of roster entries of a gender, byes included
pub fn count_gender(players: &[Player], gender: Gender) -> usize {
    players.iter().filter(|p| p.gender == gender).count()
}

/// Count of real players of a gender
pub fn count_real_gender(players: &[Player], gender: Gender) -> usize {
    players.iter().filter(|p| p.is_real() && p.gender == gender).count()
}

fn pad_total(roster: &mut Vec<Player>) {
    if roster.len() % 2 == 1 {
        push_placeholder(roster, Gender::Neutral);
    }
}

fn pad_gender(roster: &mut Vec<Player>, gender: Gender) {
    if count_gender(roster, gender) % 2 == 1 {
        push_placeholder(roster, gender);
    }
}

fn push_placeholder(roster: &mut Vec<Player>, gender: Gender) {
    let id = next_id(roster);
    debug!(id, %gender, "adding bye to roster");
    roster.push(Player::placeholder(id, gender));
}

fn next_id(roster: &[Player]) -> PlayerId {
    roster.iter().map(|p| p.id).max().map(|max| max + 1).unwrap_or(0)
}
