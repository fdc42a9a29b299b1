pub mod types;
pub mod roster;
pub mod ledger;
pub mod slot_utils;
pub mod singles;
pub mod doubles;
pub mod mixed;
pub mod balance;
pub mod generate;

pub use types::{Gender, Match, Mode, Player, PlayerId, Schedule};
pub use roster::normalize_roster;
pub use slot_utils::{slot_to_time, total_matches};
pub use singles::generate_singles;
pub use doubles::generate_doubles;
pub use mixed::{generate_mixed, generate_mixed_regular, mixed_allocation};
pub use balance::{balance_schedule, compute_match_counts, spread, Balanced, DEFAULT_TRIALS};
pub use generate::{generate_balanced, generate_schedule};
