use serde_json::Value;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Parse a payload value into a UTC instant.
///
/// Strings may be RFC 3339, an ISO-8601 date-time without offset (read as UTC)
/// or an ISO-8601 calendar date down to year precision. Numbers are
/// milliseconds since the Unix epoch.
pub fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::String(text) => parse_str(text.trim()),
        Value::Number(number) => {
            let millis = number.as_i64()?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
        }
        _ => None,
    }
}

fn parse_str(text: &str) -> Option<OffsetDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = OffsetDateTime::parse(text, &Rfc3339) {
        // None when the UTC instant falls outside the supported year range
        return datetime.checked_to_offset(UtcOffset::UTC);
    }

    let local_formats: [&[FormatItem<'_>]; 5] = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ];

    for format in local_formats {
        if let Ok(datetime) = PrimitiveDateTime::parse(text, format) {
            return Some(datetime.assume_utc());
        }
    }

    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight().assume_utc());
    }

    parse_partial_date(text).map(|date| date.midnight().assume_utc())
}

/// `YYYY` or `YYYY-MM`, both anchored to the first day.
fn parse_partial_date(text: &str) -> Option<Date> {
    let mut parts = text.split('-');

    let year = parts
        .next()
        .filter(|part| part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit()))?
        .parse::<i32>()
        .ok()?;

    let month = match parts.next() {
        Some(part) if part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit()) => {
            Month::try_from(part.parse::<u8>().ok()?).ok()?
        }
        Some(_) => return None,
        None => Month::January,
    };

    if parts.next().is_some() {
        return None;
    }

    Date::from_calendar_date(year, month, 1).ok()
}

/// Render a bound the way it is shown in failure messages.
pub fn format_timestamp(
    datetime: OffsetDateTime,
    date_only: bool,
) -> Result<String, time::error::Format> {
    if date_only {
        datetime.format(format_description!("[year]-[month]-[day]"))
    } else {
        datetime.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn parses_calendar_dates_as_utc_midnight() {
        assert_eq!(
            parse_timestamp(&json!("2024-03-01")),
            Some(datetime!(2024-03-01 0:00 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03")),
            Some(datetime!(2024-03-01 0:00 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!("2024")),
            Some(datetime!(2024-01-01 0:00 UTC))
        );
    }

    #[test]
    fn parses_datetimes_with_and_without_offset() {
        assert_eq!(
            parse_timestamp(&json!("2024-03-01T10:15:00Z")),
            Some(datetime!(2024-03-01 10:15 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03-01T12:15:00+02:00")),
            Some(datetime!(2024-03-01 10:15 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03-01T10:15")),
            Some(datetime!(2024-03-01 10:15 UTC))
        );
        assert_eq!(
            parse_timestamp(&json!("2024-03-01 10:15:30")),
            Some(datetime!(2024-03-01 10:15:30 UTC))
        );
    }

    #[test]
    fn parses_epoch_milliseconds() {
        assert_eq!(
            parse_timestamp(&json!(1_709_251_200_000_i64)),
            Some(datetime!(2024-03-01 0:00 UTC))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(&json!("")), None);
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!("2024-13-01")), None);
        assert_eq!(parse_timestamp(&json!("2024-02-30")), None);
        assert_eq!(parse_timestamp(&json!("24-03")), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn rejects_offsets_that_leave_the_year_range() {
        assert_eq!(parse_timestamp(&json!("9999-12-31T23:00:00-05:00")), None);
        assert_eq!(
            parse_timestamp(&json!("9999-12-31T18:00:00-05:00")),
            Some(datetime!(9999-12-31 23:00 UTC))
        );
    }

    #[test]
    fn formats_bounds() {
        let at = datetime!(2018-01-01 0:00 UTC);
        assert_eq!(format_timestamp(at, true).unwrap(), "2018-01-01");
        assert_eq!(format_timestamp(at, false).unwrap(), "2018-01-01T00:00:00Z");
    }
}
