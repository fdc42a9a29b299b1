use thiserror::Error;

use crate::schedule::{Gender, PlayerId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{}: need at least {required} players, found {available}", pool_label(.gender))]
    InsufficientPlayers {
        gender: Option<Gender>,
        required: usize,
        available: usize,
    },

    #[error("Player id {0} appears more than once in the roster")]
    DuplicatePlayerId(PlayerId),
}

impl ScheduleError {
    /// Whether the caller can fix this by changing the roster or mode
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScheduleError::InsufficientPlayers { .. } => true,
            ScheduleError::DuplicatePlayerId(_) => false,
        }
    }
}

fn pool_label(gender: &Option<Gender>) -> String {
    match gender {
        Some(Gender::Male) => "Not enough male players for doubles".to_string(),
        Some(Gender::Female) => "Not enough female players for doubles".to_string(),
        Some(Gender::Neutral) | None => "Not enough players".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row {row}: unknown gender '{value}'")]
    InvalidGender { row: usize, value: String },

    #[error("Roster is empty")]
    Empty,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("Session length must be more than 0 and at most {max} hours, got {hours}")]
    InvalidSessionHours { hours: f64, max: f64 },

    #[error("At most {max} trials allowed, got {trials}")]
    TooManyTrials { trials: usize, max: usize },
}
