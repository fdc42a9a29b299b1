use std::io::Write;
use std::path::Path;
use chrono::NaiveTime;
use csv::WriterBuilder;

use crate::display::schedule_rows;
use crate::schedule::Match;

/// Writes the schedule as CSV with columns match,start,team_1,team_2
pub fn write_schedule_csv<W: Write>(
    writer: W,
    schedule: &[Match],
    start: NaiveTime,
    match_minutes: u32,
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(["match", "start", "team_1", "team_2"])?;
    for row in schedule_rows(schedule, start, match_minutes) {
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the schedule to a CSV file, replacing any existing file
pub fn export_schedule_csv(
    schedule: &[Match],
    csv_path: &Path,
    start: NaiveTime,
    match_minutes: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(csv_path)?;
    write_schedule_csv(file, schedule, start, match_minutes)?;
    Ok(())
}
