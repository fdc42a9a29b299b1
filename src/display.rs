use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use chrono::NaiveTime;

use crate::schedule::{compute_match_counts, slot_to_time, Gender, Match, Mode, Player, PlayerId};

pub const MALE_COLORS: [&str; 5] = ["blue", "green", "red", "orange", "purple"];
pub const FEMALE_COLORS: [&str; 5] = ["pink", "magenta", "violet", "brown", "gold"];

/// Highlight color per real player, handed out in roster order and cycling
/// through each gender's palette. Byes get no color.
pub fn color_map(players: &[Player]) -> HashMap<PlayerId, &'static str> {
    let mut colors = HashMap::new();
    let (mut male_index, mut female_index) = (0, 0);

    for player in players.iter().filter(|p| p.is_real()) {
        let color = if player.gender == Gender::Male {
            male_index += 1;
            MALE_COLORS[(male_index - 1) % MALE_COLORS.len()]
        } else {
            female_index += 1;
            FEMALE_COLORS[(female_index - 1) % FEMALE_COLORS.len()]
        };
        colors.insert(player.id, color);
    }

    colors
}

/// Formats a player as "Name (Gender)", or "Bye" for a placeholder
pub fn format_player(player: &Player) -> String {
    if player.is_placeholder {
        "Bye".to_string()
    } else {
        format!("{} ({})", player.name, player.gender)
    }
}

/// Formats one side of a match, doubles partners joined with " & "
pub fn format_side(side: &[&Player]) -> String {
    side.iter()
        .map(|p| format_player(p))
        .collect::<Vec<_>>()
        .join(" & ")
}

/// One display row per match: (label, start time, team 1, team 2)
pub fn schedule_rows(schedule: &[Match], start: NaiveTime, match_minutes: u32) -> Vec<[String; 4]> {
    schedule
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let (side_a, side_b) = m.sides();
            [
                format!("Match {}", idx + 1),
                slot_to_time(start, idx, match_minutes),
                format_side(&side_a),
                format_side(&side_b),
            ]
        })
        .collect()
}

/// Writes a schedule to a file in the format: Match N (HH:MM) team1 vs team2
pub fn write_schedule_to_file(
    title: &str,
    schedule: &[Match],
    start: NaiveTime,
    match_minutes: u32,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** {} **", title)?;
    for [label, time, team_1, team_2] in schedule_rows(schedule, start, match_minutes) {
        writeln!(file, "{} ({}) {} vs {}", label, time, team_1, team_2)?;
    }

    Ok(())
}

/// Prints the schedule as a table
pub fn print_schedule(title: &str, schedule: &[Match], start: NaiveTime, match_minutes: u32) {
    println!("\n=== {} Schedule ===", title);
    println!("Total matches: {}", schedule.len());
    println!();
    for [label, time, team_1, team_2] in schedule_rows(schedule, start, match_minutes) {
        println!("  {:<9} {} | {} | {}", label, time, team_1, team_2);
    }
}

/// Prints how many matches each real player got
pub fn print_player_stats(schedule: &[Match], mode: Mode, players: &[Player]) {
    let counts = compute_match_counts(schedule, mode, players);

    println!("\n=== Matches per player ===");
    for player in players.iter().filter(|p| p.is_real()) {
        if let Some(count) = counts.get(&player.id) {
            println!("  {:<20} {:<7} {}", player.name, player.gender.to_string(), count);
        }
    }
}
