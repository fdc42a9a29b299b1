pub mod submission;
pub mod export;

pub use submission::{RosterSubmission, RosterSubmissionRequest, SubmittedPlayer, validate_submission};
pub use export::{export_schedule_csv, write_schedule_csv};
