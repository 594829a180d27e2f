use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Local "now" with the time fields zeroed.
pub fn today_midnight() -> NaiveDateTime {
    start_of_day(Local::now().date_naive())
}

/// Stable `YYYY-MM-DD` key. Every day-equality check goes through this so
/// time-of-day never leaks into the comparison.
pub fn format_day_key<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn parse_day_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_KEY_FORMAT).ok()
}

pub fn is_same_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    format_day_key(a) == format_day_key(b)
}

pub fn is_today<D: Datelike>(date: &D) -> bool {
    is_same_day(date, &today_midnight())
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 of the given day.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(MILLIS_PER_DAY - 1)
}

/// Parses the timestamp shapes the backend emits: offset-aware RFC 3339
/// (converted to local time), local date-times with or without seconds and
/// fractions, and bare dates.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    parse_day_key(value).map(start_of_day)
}

pub fn days_in_month<D: Datelike>(date: &D) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(date.year(), date.month(), *day).is_some())
        .unwrap_or(28)
}

/// Weekday of the 1st of the month, 0 = Sunday.
pub fn first_weekday_of_month<D: Datelike>(date: &D) -> u32 {
    (date.weekday().num_days_from_sunday() + 7 - date.day0() % 7) % 7
}

/// First day of the month `months` away from the anchor's month.
pub fn shift_month(anchor: NaiveDate, months: i32) -> NaiveDate {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let shifted = if months >= 0 {
        first.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}
