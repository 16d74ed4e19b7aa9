//! Local-day and wall-clock helpers. Every date here is a calendar day in
//! the machine's timezone, never UTC.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

pub fn local_date_str(now: DateTime<Local>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

/// Parses `YYYY-MM-DD` as a local calendar day. Out-of-range months and
/// days roll over into the neighbouring month or year, so `2025-02-30` is
/// March 2nd. Non-numeric input is `None`.
pub fn parse_local_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().split('-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<i64>().ok()?;
    let day = parts.next()?.parse::<i64>().ok()?;
    if parts.next().is_some() || year == 0 {
        return None;
    }
    let month_index = month - 1;
    let year = year.checked_add(i32::try_from(month_index.div_euclid(12)).ok()?)?;
    let month = u32::try_from(month_index.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::try_days(day - 1)?)
}

/// Converts `h:mm AM/PM` to `HH:MM`. A malformed 12-hour value becomes
/// `00:00`; anything without an AM/PM marker is returned trimmed.
pub fn to_24h(value: &str) -> String {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    if !lower.contains("am") && !lower.contains("pm") {
        return value.to_string();
    }
    parse_12h(value)
        .map(|(hour, minute)| format!("{hour:02}:{minute}"))
        .unwrap_or_else(|| "00:00".to_string())
}

fn parse_12h(value: &str) -> Option<(u32, &str)> {
    let split = value.len().checked_sub(2)?;
    let (clock, marker) = (value.get(..split)?, value.get(split..)?);
    let is_pm = match marker.to_ascii_uppercase().as_str() {
        "AM" => false,
        "PM" => true,
        _ => return None,
    };
    let (hour, minute) = clock.trim_end().split_once(':')?;
    let valid_hour = !hour.is_empty() && hour.len() <= 2 && hour.bytes().all(|b| b.is_ascii_digit());
    let valid_minute = minute.len() == 2 && minute.bytes().all(|b| b.is_ascii_digit());
    if !valid_hour || !valid_minute {
        return None;
    }
    let mut hour: u32 = hour.parse().ok()?;
    if hour == 12 && !is_pm {
        hour = 0;
    }
    if hour < 12 && is_pm {
        hour += 12;
    }
    Some((hour, minute))
}

/// Splits an `HH:MM` string into numbers. Unparsable parts count as zero.
pub fn hours_minutes(value: &str) -> (i64, i64) {
    let mut parts = value.split(':');
    let mut next = || {
        parts
            .next()
            .and_then(|part| part.trim().parse::<i64>().ok())
            .unwrap_or(0)
    };
    let hours = next();
    let minutes = next();
    (hours, minutes)
}

/// Leading integer of an `HH:MM` string, like reading just the hour hand.
pub fn leading_hour(value: &str) -> Option<u32> {
    let head = value.split(':').next()?.trim_start();
    let digits: String = head.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Milliseconds since the epoch for a local date and time. Returns 0 when
/// the date is unusable; a bad time falls back to midnight.
pub fn local_timestamp(date: &str, time: &str) -> i64 {
    let Some(day) = parse_local_date(date) else {
        return 0;
    };
    let time = if time.is_empty() { "00:00" } else { time };
    let (hours, minutes) = hours_minutes(&to_24h(time));
    let Some(midnight) = day.and_hms_opt(0, 0, 0) else {
        return 0;
    };
    let naive = midnight + Duration::hours(hours) + Duration::minutes(minutes);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|moment| moment.timestamp_millis())
        .unwrap_or(0)
}

/// `8 AM`, `12 PM`, `12 AM` for hour 0 or 24.
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 | 24 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h > 12 => format!("{} PM", h - 12),
        h => format!("{h} AM"),
    }
}

/// Day formatted the way review submissions record it.
pub fn display_date(now: DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_hour_conversion() {
        assert_eq!(to_24h("9:05 AM"), "09:05");
        assert_eq!(to_24h("12:30 am"), "00:30");
        assert_eq!(to_24h("12:15 PM"), "12:15");
        assert_eq!(to_24h("1:45PM"), "13:45");
        assert_eq!(to_24h("14:20"), "14:20");
        assert_eq!(to_24h("noon pm"), "00:00");
    }

    #[test]
    fn local_dates_roll_over_like_a_calendar() {
        assert_eq!(parse_local_date("2025-03-09"), NaiveDate::from_ymd_opt(2025, 3, 9));
        assert_eq!(parse_local_date("2025-02-30"), NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(parse_local_date("2025-13-01"), NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(parse_local_date("2025-03-00"), NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(parse_local_date("2025-ab-01"), None);
        assert_eq!(parse_local_date(""), None);
        assert_eq!(parse_local_date("09/03/2025"), None);
    }

    #[test]
    fn timestamp_is_local_and_degrades() {
        let expected = Local
            .with_ymd_and_hms(2025, 6, 1, 15, 30, 0)
            .earliest()
            .unwrap()
            .timestamp_millis();
        assert_eq!(local_timestamp("2025-06-01", "3:30 PM"), expected);
        assert_eq!(local_timestamp("2025-06-01", "15:30"), expected);
        assert_eq!(local_timestamp("garbage", "15:30"), 0);

        let midnight = Local
            .with_ymd_and_hms(2025, 6, 1, 0, 0, 0)
            .earliest()
            .unwrap()
            .timestamp_millis();
        assert_eq!(local_timestamp("2025-06-01", "whenever"), midnight);
    }

    #[test]
    fn hour_labels() {
        assert_eq!(hour_label(8), "8 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_label(17), "5 PM");
        assert_eq!(hour_label(24), "12 AM");
    }

    #[test]
    fn leading_hour_reads_prefix() {
        assert_eq!(leading_hour("09:30"), Some(9));
        assert_eq!(leading_hour("24:00"), Some(24));
        assert_eq!(leading_hour("x"), None);
    }
}
