//! Normalization of document dates to ISO 8601

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Normalize a metadata date.
///
/// Parseable dates become ISO 8601 UTC strings with millisecond precision.
/// Unparseable values are returned unchanged; absent or blank values yield
/// `None`.
pub fn normalize_date(value: Option<&str>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(
        parse_date(trimmed)
            .map(|dt| dt.format(ISO_FORMAT).to_string())
            .unwrap_or_else(|| raw.to_string()),
    )
}

/// Parse any supported date form into UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }
    parse_pdf_date(value)
}

/// Parse a PDF date string: `D:YYYYMMDDHHmmSSOHH'mm'`.
///
/// Everything after the year is optional. The `D:` prefix is optional too.
/// Missing time zone means UTC.
pub fn parse_pdf_date(value: &str) -> Option<DateTime<Utc>> {
    let s = value.strip_prefix("D:").unwrap_or(value);
    let bytes = s.as_bytes();
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits < 4 || digits % 2 != 0 || digits > 14 {
        return None;
    }

    let field = |start: usize, default: u32| -> Option<u32> {
        if start + 2 <= digits {
            s[start..start + 2].parse().ok()
        } else {
            Some(default)
        }
    };

    let year: i32 = s[0..4].parse().ok()?;
    let month = field(4, 1)?;
    let day = field(6, 1)?;
    let hour = field(8, 0)?;
    let minute = field(10, 0)?;
    let second = field(12, 0)?;

    let offset = parse_pdf_offset(&s[digits..])?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let local = offset.from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}

/// Parse the trailing `Z`, `+HH'mm'` or `-HH'mm'` of a PDF date.
fn parse_pdf_offset(tz: &str) -> Option<FixedOffset> {
    let tz = tz.trim_end_matches('\'');
    let sign = match tz.chars().next() {
        None => return FixedOffset::east_opt(0),
        Some('Z') | Some('z') => {
            return if tz[1..].chars().all(|c| c == '0' || c == '\'') {
                FixedOffset::east_opt(0)
            } else {
                None
            };
        }
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let rest = &tz[1..];
    if !rest.chars().all(|c| c.is_ascii_digit() || c == '\'') {
        return None;
    }
    let (hours, minutes) = match rest.split_once('\'') {
        Some((h, m)) => (h, m),
        None if rest.len() > 2 => rest.split_at(2),
        None => (rest, ""),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = if minutes.is_empty() {
        0
    } else {
        minutes.parse().ok()?
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
