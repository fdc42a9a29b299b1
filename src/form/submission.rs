use serde::{Deserialize, Serialize};

use crate::config::{check_session_hours, check_trials, parse_mode, GameLength, SessionSettings};
use crate::parser::{default_player_name, parse_gender};
use crate::schedule::slot_utils::parse_time;
use crate::schedule::{normalize_roster, Player, PlayerId, DEFAULT_TRIALS};

/// One row of the player form
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedPlayer {
    #[serde(default)]
    pub name: String,
    pub gender: String,
}

/// Roster and session settings request from frontend
#[derive(Debug, Clone, Deserialize)]
pub struct RosterSubmissionRequest {
    pub mode: String,
    /// 4 or 6
    pub games_per_match: u32,
    pub session_hours: f64,
    pub players: Vec<SubmittedPlayer>,
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub start_time: Option<String>,
}

/// A validated submission: settings plus the normalized roster
#[derive(Debug, Clone, Serialize)]
pub struct RosterSubmission {
    pub settings: SessionSettings,
    pub players: Vec<Player>,
    pub total_matches: usize,
}

/// Validates a roster submission and builds the normalized roster
pub fn validate_submission(req: &RosterSubmissionRequest) -> Result<RosterSubmission, String> {
    let mode = parse_mode(&req.mode).ok_or_else(|| format!("Invalid game mode: {}", req.mode))?;

    let game_length = GameLength::from_games(req.games_per_match)
        .ok_or_else(|| format!("Games per match must be 4 or 6, got {}", req.games_per_match))?;

    let session_hours = check_session_hours(req.session_hours).map_err(|e| e.to_string())?;
    let trials = check_trials(req.trials.unwrap_or(DEFAULT_TRIALS)).map_err(|e| e.to_string())?;

    if req.players.is_empty() {
        return Err("At least one player is required".to_string());
    }

    let mut players = Vec::with_capacity(req.players.len());
    for (i, submitted) in req.players.iter().enumerate() {
        let gender = parse_gender(&submitted.gender)
            .ok_or_else(|| format!("Player {}: invalid gender '{}'", i + 1, submitted.gender))?;
        let name = if submitted.name.trim().is_empty() {
            default_player_name(i + 1)
        } else {
            submitted.name.trim().to_string()
        };
        players.push(Player::new(i as PlayerId, name, gender));
    }

    let mut settings = SessionSettings {
        mode,
        game_length,
        session_hours,
        trials,
        seed: req.seed,
        ..Default::default()
    };
    if let Some(start) = &req.start_time {
        settings.start_time = parse_time(start).ok_or_else(|| format!("Invalid start time: {}", start))?;
    }

    let total_matches = settings.total_matches();
    Ok(RosterSubmission {
        players: normalize_roster(&players, mode),
        settings,
        total_matches,
    })
}
