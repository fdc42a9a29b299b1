use chrono::{Duration, NaiveTime};

/// Number of whole matches that fit in a session
pub fn total_matches(session_minutes: u32, match_minutes: u32) -> usize {
    if match_minutes == 0 {
        return 0;
    }
    (session_minutes / match_minutes) as usize
}

/// Parses a time string (HH:MM)
pub fn parse_time(time_str: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M").ok()
}

/// Start time of the match in `index` (0-based), wrapping past midnight
pub fn match_start_time(start: NaiveTime, index: usize, match_minutes: u32) -> NaiveTime {
    let offset = Duration::minutes(index as i64 * match_minutes as i64);
    start.overflowing_add_signed(offset).0
}

/// Formats a match start time (HH:MM) for display
pub fn slot_to_time(start: NaiveTime, index: usize, match_minutes: u32) -> String {
    match_start_time(start, index, match_minutes).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_hours_of_twenty_minute_matches() {
        assert_eq!(total_matches(360, 20), 18);
        assert_eq!(total_matches(360, 30), 12);
        assert_eq!(total_matches(90, 20), 4);
        assert_eq!(total_matches(15, 20), 0);
        assert_eq!(total_matches(60, 0), 0);
    }

    #[test]
    fn slot_times_step_by_match_length() {
        let start = parse_time("09:00").unwrap();
        assert_eq!(slot_to_time(start, 0, 20), "09:00");
        assert_eq!(slot_to_time(start, 4, 20), "10:20");
        assert_eq!(slot_to_time(start, 3, 30), "10:30");
    }

    #[test]
    fn slot_times_wrap_past_midnight() {
        let start = parse_time("23:30").unwrap();
        assert_eq!(slot_to_time(start, 2, 30), "00:30");
    }

    #[test]
    fn bad_times_are_rejected() {
        assert!(parse_time("25:00").is_none());
        assert!(parse_time("nine").is_none());
        assert_eq!(parse_time(" 07:45 "), NaiveTime::from_hms_opt(7, 45, 0));
    }
}
