use chrono::{DateTime, Duration, Local, NaiveDate, SecondsFormat, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Canonical stored form for an instant: RFC 3339 with a numeric UTC offset.
pub fn format_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn now_iso() -> String {
    format_iso(Utc::now())
}

/// Best-effort timestamp parsing. Malformed input yields `None`, never an
/// error; offsets are normalized to UTC.
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Projected next-watering instant: base timestamp plus the interval.
/// `None` only when the base fails to parse.
pub fn next_watering_from(base_iso: &str, interval_days: i64) -> Option<String> {
    let base = parse_iso(base_iso)?;
    let interval = if interval_days > 0 { interval_days } else { 7 };
    Some(format_iso(base + Duration::days(interval)))
}

pub fn is_due(next_iso: &str, now: DateTime<Utc>) -> bool {
    parse_iso(next_iso).is_some_and(|next| next <= now)
}

/// Short human-friendly delta: "in 3d", "2d ago", "today". The day count is
/// the signed floor of the duration, so an instant less than a day in the
/// past already reads as "1d ago".
pub fn human_delta(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (target - now).num_seconds().div_euclid(SECONDS_PER_DAY);
    if days == 0 {
        "today".to_string()
    } else if days > 0 {
        format!("in {days}d")
    } else {
        format!("{}d ago", -days)
    }
}

/// Interpret a calendar date from a backdated log form as UTC midnight.
pub fn backdate_to_iso(date: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(format_iso(midnight.and_utc()))
}

// Display conversion happens only at render time; stored values stay UTC.

pub fn display_datetime(iso: &str) -> Option<String> {
    parse_iso(iso).map(|dt| dt.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string())
}

pub fn today_date_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(iso: &str) -> DateTime<Utc> {
        parse_iso(iso).expect("test instant must parse")
    }

    #[test]
    fn parse_iso_rejects_garbage() {
        assert!(parse_iso("not a timestamp").is_none());
        assert!(parse_iso("2026-13-40T00:00:00+00:00").is_none());
        assert!(parse_iso("").is_none());
    }

    #[test]
    fn parse_iso_normalizes_offsets_to_utc() {
        let parsed = parse_iso("2026-03-01T10:00:00+02:00").unwrap();
        assert_eq!(format_iso(parsed), "2026-03-01T08:00:00+00:00");
    }

    #[test]
    fn next_watering_adds_interval_days() {
        let next = next_watering_from("2026-03-01T12:00:00+00:00", 3).unwrap();
        assert_eq!(at(&next), at("2026-03-04T12:00:00+00:00"));
    }

    #[test]
    fn next_watering_treats_nonpositive_interval_as_weekly() {
        let next = next_watering_from("2026-03-01T12:00:00+00:00", 0).unwrap();
        assert_eq!(at(&next), at("2026-03-08T12:00:00+00:00"));
    }

    #[test]
    fn next_watering_absent_for_unparsable_base() {
        assert!(next_watering_from("never", 3).is_none());
    }

    #[test]
    fn human_delta_same_instant_is_today() {
        let now = at("2026-03-01T12:00:00+00:00");
        assert_eq!(human_delta(now, now), "today");
    }

    #[test]
    fn human_delta_under_a_day_ahead_is_today() {
        let now = at("2026-03-01T12:00:00+00:00");
        let target = at("2026-03-02T11:59:00+00:00");
        assert_eq!(human_delta(target, now), "today");
    }

    #[test]
    fn human_delta_future_days() {
        let now = at("2026-03-01T12:00:00+00:00");
        let target = at("2026-03-04T13:00:00+00:00");
        assert_eq!(human_delta(target, now), "in 3d");
    }

    #[test]
    fn human_delta_floors_past_instants() {
        let now = at("2026-03-01T12:00:00+00:00");
        assert_eq!(human_delta(at("2026-03-01T02:00:00+00:00"), now), "1d ago");
        assert_eq!(human_delta(at("2026-02-27T12:00:00+00:00"), now), "2d ago");
    }

    #[test]
    fn is_due_at_exact_boundary() {
        let now = at("2026-03-01T12:00:00+00:00");
        assert!(is_due("2026-03-01T12:00:00+00:00", now));
        assert!(is_due("2026-02-20T00:00:00+00:00", now));
        assert!(!is_due("2026-03-01T12:00:01+00:00", now));
        assert!(!is_due("garbage", now));
    }

    #[test]
    fn backdate_becomes_utc_midnight() {
        let iso = backdate_to_iso("2026-01-15").unwrap();
        assert_eq!(at(&iso), at("2026-01-15T00:00:00+00:00"));
        assert!(backdate_to_iso("yesterday").is_none());
        assert!(backdate_to_iso("").is_none());
    }
}
