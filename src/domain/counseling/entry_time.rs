//! Combining a session's local date and entry time into a single instant.
//!
//! Sessions are recorded in school-local wall-clock terms: a `session_date`
//! (`YYYY-MM-DD`) and an `entry_time` (`HH:MM` or `HH:MM:SS`). The school's
//! UTC offset turns that pair into a [`Timestamp`].

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::domain::foundation::{Timestamp, ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%H:%M";

/// Largest offsets in use anywhere (UTC-12:00 .. UTC+14:00), in minutes.
pub const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Converts between school-local date/time text and UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryClock {
    offset: FixedOffset,
}

impl EntryClock {
    /// Clock for a school running on UTC.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Clock for a school at `minutes` east of UTC.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the offset is outside UTC-12:00 .. UTC+14:00
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, ValidationError> {
        if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
            return Err(ValidationError::invalid_format(
                "utc_offset_minutes",
                format!("{} is outside -720..=840", minutes),
            ));
        }
        FixedOffset::east_opt(minutes * 60)
            .map(|offset| Self { offset })
            .ok_or_else(|| {
                ValidationError::invalid_format("utc_offset_minutes", "offset out of range")
            })
    }

    /// Returns the offset in minutes east of UTC.
    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Parses date and time, rejecting anything malformed.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if either part is blank
    /// - `InvalidFormat` if either part does not parse
    pub fn combine(&self, session_date: &str, entry_time: &str) -> Result<Timestamp, ValidationError> {
        let date = parse_date(session_date)?;
        let time = parse_time(entry_time)?;
        self.to_timestamp(NaiveDateTime::new(date, time))
    }

    /// Lenient variant of [`combine`](Self::combine) for stored rows.
    ///
    /// Missing or malformed parts yield `None`, which callers treat as an
    /// unknown entry instant.
    pub fn combine_stored(
        &self,
        session_date: Option<&str>,
        entry_time: Option<&str>,
    ) -> Option<Timestamp> {
        self.combine(session_date?, entry_time?).ok()
    }

    /// Splits an instant back into local `(session_date, entry_time)` text.
    pub fn split(&self, instant: &Timestamp) -> (String, String) {
        let local = instant.as_datetime().with_timezone(&self.offset);
        (
            local.format(DATE_FORMAT).to_string(),
            local.format(TIME_FORMAT).to_string(),
        )
    }

    fn to_timestamp(&self, naive: NaiveDateTime) -> Result<Timestamp, ValidationError> {
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
            .ok_or_else(|| ValidationError::invalid_format("entry_time", "ambiguous local time"))
    }
}

impl Default for EntryClock {
    fn default() -> Self {
        Self::utc()
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field("session_date"));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_format("session_date", "expected YYYY-MM-DD"))
}

fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field("entry_time"));
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, SHORT_TIME_FORMAT))
        .map_err(|_| ValidationError::invalid_format("entry_time", "expected HH:MM or HH:MM:SS"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    #[test]
    fn utc_clock_combines_short_time() {
        let clock = EntryClock::utc();
        let combined = clock.combine("2024-03-11", "09:15").unwrap();
        assert_eq!(combined, ts("2024-03-11T09:15:00Z"));
    }

    #[test]
    fn offset_clock_shifts_to_utc() {
        let clock = EntryClock::from_offset_minutes(180).unwrap();
        let combined = clock.combine("2024-03-11", "09:15:30").unwrap();
        assert_eq!(combined, ts("2024-03-11T06:15:30Z"));
    }

    #[test]
    fn negative_offset_can_cross_midnight() {
        let clock = EntryClock::from_offset_minutes(-300).unwrap();
        let combined = clock.combine("2024-03-11", "22:00").unwrap();
        assert_eq!(combined, ts("2024-03-12T03:00:00Z"));
    }

    #[test]
    fn split_inverts_combine() {
        let clock = EntryClock::from_offset_minutes(180).unwrap();
        let instant = ts("2024-03-11T06:15:30Z");
        let (date, time) = clock.split(&instant);
        assert_eq!(date, "2024-03-11");
        assert_eq!(time, "09:15:30");
        assert_eq!(clock.combine(&date, &time).unwrap(), instant);
    }

    #[test]
    fn combine_rejects_blank_parts() {
        let clock = EntryClock::utc();
        assert!(matches!(
            clock.combine("", "09:00"),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(matches!(
            clock.combine("2024-03-11", "  "),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn combine_rejects_malformed_parts() {
        let clock = EntryClock::utc();
        assert!(clock.combine("11/03/2024", "09:00").is_err());
        assert!(clock.combine("2024-02-30", "09:00").is_err());
        assert!(clock.combine("2024-03-11", "25:00").is_err());
        assert!(clock.combine("2024-03-11", "nine").is_err());
    }

    #[test]
    fn combine_stored_is_none_on_missing_or_bad_data() {
        let clock = EntryClock::utc();
        assert!(clock.combine_stored(None, Some("09:00")).is_none());
        assert!(clock.combine_stored(Some("2024-03-11"), None).is_none());
        assert!(clock.combine_stored(Some("2024-03-11"), Some("later")).is_none());
        assert!(clock.combine_stored(Some("2024-03-11"), Some("09:00")).is_some());
    }

    #[test]
    fn offset_outside_range_is_rejected() {
        assert!(EntryClock::from_offset_minutes(MAX_UTC_OFFSET_MINUTES + 1).is_err());
        assert!(EntryClock::from_offset_minutes(MIN_UTC_OFFSET_MINUTES - 1).is_err());
        assert_eq!(
            EntryClock::from_offset_minutes(-720).unwrap().offset_minutes(),
            -720
        );
    }
}
