use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Whole minutes between two timestamps, truncating, never negative.
pub(crate) fn whole_minutes_between(start: PrimitiveDateTime, end: PrimitiveDateTime) -> i32 {
    let seconds = (end.assume_utc() - start.assume_utc()).whole_seconds();
    if seconds <= 0 {
        0
    } else {
        (seconds / 60) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Duration, Time};

    fn at(h: u8, m: u8, s: u8) -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(h, m, s).unwrap())
    }

    #[test]
    fn format_primitive_outputs_utc_z() {
        assert_eq!(format_primitive(at(10, 20, 30)), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn whole_minutes_truncates() {
        assert_eq!(whole_minutes_between(at(10, 0, 0), at(10, 5, 59)), 5);
        assert_eq!(whole_minutes_between(at(10, 0, 0), at(10, 0, 30)), 0);
    }

    #[test]
    fn whole_minutes_clamps_negative() {
        let start = at(10, 0, 0);
        let end = start - Duration::minutes(3);
        assert_eq!(whole_minutes_between(start, end), 0);
    }
}
