use std::path::PathBuf;
use chrono::NaiveTime;
use serde::{Serialize, Deserialize};

use crate::error::ConfigError;
use crate::schedule::slot_utils::{parse_time, total_matches};
use crate::schedule::{Mode, DEFAULT_TRIALS};

/// Longest session a schedule is built for
pub const MAX_SESSION_HOURS: f64 = 24.0;

/// Upper bound on balancer trials per request
pub const MAX_TRIALS: usize = 1000;

/// Rejects NaN, non-positive and over-long sessions
pub fn check_session_hours(hours: f64) -> Result<f64, ConfigError> {
    if hours > 0.0 && hours <= MAX_SESSION_HOURS {
        Ok(hours)
    } else {
        Err(ConfigError::InvalidSessionHours {
            hours,
            max: MAX_SESSION_HOURS,
        })
    }
}

pub fn check_trials(trials: usize) -> Result<usize, ConfigError> {
    if trials <= MAX_TRIALS {
        Ok(trials)
    } else {
        Err(ConfigError::TooManyTrials {
            trials,
            max: MAX_TRIALS,
        })
    }
}

/// Games played per match, which fixes how long a match slot lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameLength {
    /// 4 games, 20 minutes
    FourGames,
    /// 6 games, 30 minutes
    SixGames,
}

impl GameLength {
    pub fn match_minutes(&self) -> u32 {
        match self {
            GameLength::FourGames => 20,
            GameLength::SixGames => 30,
        }
    }

    pub fn from_games(games: u32) -> Option<Self> {
        match games {
            4 => Some(GameLength::FourGames),
            6 => Some(GameLength::SixGames),
            _ => None,
        }
    }
}

/// Settings for one playing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub mode: Mode,
    pub game_length: GameLength,
    pub session_hours: f64,
    pub trials: usize,
    /// Fixed RNG seed for reproducible schedules
    pub seed: Option<u64>,
    pub start_time: NaiveTime,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Singles,
            game_length: GameLength::FourGames,
            session_hours: 6.0,
            trials: DEFAULT_TRIALS,
            seed: None,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        }
    }
}

impl SessionSettings {
    pub fn session_minutes(&self) -> u32 {
        (self.session_hours * 60.0).floor().max(0.0) as u32
    }

    pub fn match_minutes(&self) -> u32 {
        self.game_length.match_minutes()
    }

    pub fn total_matches(&self) -> usize {
        total_matches(self.session_minutes(), self.match_minutes())
    }
}

/// Command-line options for a CLI run
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub roster_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub settings: SessionSettings,
}

/// Parses the mode names accepted on the command line and in the web API
pub fn parse_mode(value: &str) -> Option<Mode> {
    match value.trim().to_lowercase().as_str() {
        "singles" | "single" | "단식" => Some(Mode::Singles),
        "men" | "male" | "male_doubles" | "남복" => Some(Mode::MaleDoubles),
        "women" | "female" | "female_doubles" | "여복" => Some(Mode::FemaleDoubles),
        "mixed" | "mixed_doubles" | "혼복" => Some(Mode::MixedDoubles),
        _ => None,
    }
}

/// Parses `<roster.csv> [--flag value]...` (program name already stripped)
pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, ConfigError> {
    let mut settings = SessionSettings::default();
    let mut roster_path: Option<PathBuf> = None;
    let mut output_path = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if !arg.starts_with("--") {
            if roster_path.is_some() {
                return Err(ConfigError::UnknownArgument(arg.to_string()));
            }
            roster_path = Some(PathBuf::from(arg));
            i += 1;
            continue;
        }

        let value = args
            .get(i + 1)
            .ok_or_else(|| ConfigError::MissingValue(arg.to_string()))?;
        let invalid = || ConfigError::InvalidValue {
            flag: arg.to_string(),
            value: value.clone(),
        };

        match arg {
            "--mode" => settings.mode = parse_mode(value).ok_or_else(invalid)?,
            "--games" => {
                let games: u32 = value.parse().map_err(|_| invalid())?;
                settings.game_length = GameLength::from_games(games).ok_or_else(invalid)?;
            }
            "--hours" => {
                let hours: f64 = value.parse().map_err(|_| invalid())?;
                settings.session_hours = check_session_hours(hours)?;
            }
            "--trials" => {
                let trials: usize = value.parse().map_err(|_| invalid())?;
                settings.trials = check_trials(trials)?;
            }
            "--seed" => settings.seed = Some(value.parse().map_err(|_| invalid())?),
            "--start" => settings.start_time = parse_time(value).ok_or_else(invalid)?,
            "--out" => output_path = Some(PathBuf::from(value)),
            _ => return Err(ConfigError::UnknownArgument(arg.to_string())),
        }
        i += 2;
    }

    let roster_path = roster_path.ok_or_else(|| ConfigError::MissingValue("roster file".to_string()))?;
    Ok(CliOptions {
        roster_path,
        output_path,
        settings,
    })
}
