use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Value format of a datetime-local form control
pub const INPUT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const INTERVALS: [(&str, i64); 6] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// Lenient posting date parser. Offset-less values are taken as UTC.
pub fn parse_posting_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "3 months ago" style label; the largest whole unit wins
pub fn time_ago(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(posted_at) = raw.and_then(parse_posting_date) else {
        return "Unknown".to_string();
    };

    let seconds = (now - posted_at).num_seconds();
    for (label, unit_seconds) in INTERVALS {
        let count = seconds / unit_seconds;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{} {}{} ago", count, label, plural);
        }
    }

    "Just now".to_string()
}

/// Display name for a company: the URL's host without a leading `www.`
pub fn company_label(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return "N/A".to_string();
    };

    match Url::parse(raw) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => {
                host.strip_prefix("www.").unwrap_or(host).to_string()
            }
            _ => raw.to_string(),
        },
        Err(_) => raw.to_string(),
    }
}

/// `Jan 5, 2024`
pub fn short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// Posting date reformatted for a datetime-local input; blank when unparseable
pub fn input_datetime_value(raw: Option<&str>) -> String {
    raw.and_then(parse_posting_date)
        .map(|dt| dt.format(INPUT_DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Only http(s) URLs are ever emitted as link targets
pub fn safe_href(raw: Option<&str>) -> Option<String> {
    let url = Url::parse(raw?.trim()).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}
