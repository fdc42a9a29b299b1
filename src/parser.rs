use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::RosterError;
use crate::schedule::{Gender, Player, PlayerId};

/// Parses a gender from the spellings players tend to type
pub fn parse_gender(value: &str) -> Option<Gender> {
    match value.trim().to_lowercase().as_str() {
        "male" | "m" | "man" | "men" | "남" | "남자" => Some(Gender::Male),
        "female" | "f" | "woman" | "women" | "여" | "여자" => Some(Gender::Female),
        _ => None,
    }
}

/// Name to show for a player left blank on the roster (1-based position)
pub fn default_player_name(position: usize) -> String {
    format!("Player{}", position)
}

/// Loads a roster from a CSV file with `name` and `gender` columns
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Player>, RosterError> {
    let file = std::fs::File::open(csv_path.as_ref())?;
    let players = read_roster(file)?;
    info!(path = %csv_path.as_ref().display(), players = players.len(), "loaded roster");
    Ok(players)
}

/// Reads a roster from any CSV source.
///
/// The header row is optional; without one the first column is the name and
/// the second the gender. Ids are assigned from 0 in file order.
pub fn read_roster<R: Read>(source: R) -> Result<Vec<Player>, RosterError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut records = reader.records().peekable();

    // Find column indices
    let (name_col, gender_col, has_header) = match records.peek() {
        Some(Ok(first)) => detect_columns(first),
        _ => (0, 1, false),
    };
    if has_header {
        records.next();
    }

    let mut players = Vec::new();
    for (row, result) in records.enumerate() {
        let record = result?;
        // Spreadsheet row number, counting the header
        let row_number = row + 1 + usize::from(has_header);

        let name = record.get(name_col).unwrap_or("");
        let gender_raw = record.get(gender_col).unwrap_or("");

        // Skip fully blank lines
        if name.is_empty() && gender_raw.is_empty() {
            continue;
        }

        let gender = parse_gender(gender_raw).ok_or_else(|| RosterError::InvalidGender {
            row: row_number,
            value: gender_raw.to_string(),
        })?;

        let id = players.len() as PlayerId;
        let name = if name.is_empty() {
            default_player_name(players.len() + 1)
        } else {
            name.to_string()
        };
        debug!(id, %name, %gender, "roster entry");
        players.push(Player::new(id, name, gender));
    }

    if players.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(players)
}

fn detect_columns(first: &StringRecord) -> (usize, usize, bool) {
    let lower: Vec<String> = first.iter().map(|h| h.to_lowercase()).collect();
    let name_col = lower.iter().position(|h| h.contains("name") || h.contains("이름"));
    let gender_col = lower.iter().position(|h| h.contains("gender") || h.contains("sex") || h.contains("성별"));

    match (name_col, gender_col) {
        (None, None) => (0, 1, false),
        (name, gender) => (name.unwrap_or(0), gender.unwrap_or(1), true),
    }
}
