//! Fair match schedules for a tennis session.
//!
//! Given a roster and a number of match slots, builds singles, same-gender
//! doubles or mixed doubles schedules where every player gets as close to the
//! same number of matches as possible and doubles partners rotate.

pub mod error;
pub mod config;
pub mod parser;
pub mod schedule;
pub mod display;
pub mod form;
pub mod web;

pub use error::{ConfigError, RosterError, ScheduleError};
pub use schedule::{
    compute_match_counts, generate_schedule, normalize_roster, Gender, Match, Mode, Player, PlayerId, Schedule,
};
