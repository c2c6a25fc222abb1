//! Timecode, timezone, and date-chunking helpers shared by commands.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

static TIMECODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("valid regex"));

static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid regex"));

static SOURCE_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(Source\)").expect("valid regex"));

static TRAILING_UNDERSCORE_MP4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_*\.mp4$").expect("valid regex"));

/// Make a string safe to use as a filename component.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let cleaned = UNSAFE_CHARS_RE.replace_all(name, "_");
    cleaned.chars().take(max_length).collect()
}

/// Strip the artifacts upload tooling leaves in source filenames:
/// a trailing " (Source)" marker and underscores before the extension.
pub fn clean_source_filename(filename: &str) -> String {
    let cleaned = SOURCE_SUFFIX_RE.replace_all(filename, "");
    let cleaned = TRAILING_UNDERSCORE_MP4_RE.replace(&cleaned, ".mp4");
    cleaned.trim().to_string()
}

/// Validate an `HH:MM:SS` timecode.
pub fn is_valid_timecode(timecode: &str) -> bool {
    TIMECODE_RE.is_match(timecode)
}

/// Convert `HH:MM:SS` to milliseconds. The format must already be valid.
pub fn timecode_to_ms(timecode: &str) -> Result<i64> {
    if !is_valid_timecode(timecode) {
        bail!("Invalid timecode format: '{}' (expected HH:MM:SS)", timecode);
    }
    let mut parts = timecode.split(':');
    let hh: i64 = parts.next().unwrap().parse()?;
    let mm: i64 = parts.next().unwrap().parse()?;
    let ss: i64 = parts.next().unwrap().parse()?;
    if mm > 59 || ss > 59 {
        bail!("Invalid timecode value: '{}'", timecode);
    }
    Ok(hh * 3_600_000 + mm * 60_000 + ss * 1_000)
}

/// Render whole seconds as `H:MM:SS` (matches spreadsheet duration cells).
pub fn seconds_to_hhmmss(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow!("Unknown timezone: '{}'", name))
}

/// Render a UTC epoch in the given timezone as `YYYY-MM-DD HH:MM:SS`.
pub fn format_epoch(epoch: i64, tz: Tz) -> String {
    match Utc.timestamp_opt(epoch, 0) {
        chrono::LocalResult::Single(dt) => {
            dt.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string()
        }
        _ => String::new(),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("'{}' is not a YYYY-MM-DD date", raw))
}

/// Query chunking interval for the usage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChunkInterval {
    Yearly,
    Monthly,
    Weekly,
    Daily,
}

impl ChunkInterval {
    pub fn label(&self) -> &'static str {
        match self {
            ChunkInterval::Yearly => "year",
            ChunkInterval::Monthly => "month",
            ChunkInterval::Weekly => "week",
            ChunkInterval::Daily => "day",
        }
    }
}

/// Split `[start, end]` into inclusive sub-ranges of the given interval.
/// Monthly chunks end on the last day of the month containing the chunk
/// start; yearly chunks end on Dec 31.
pub fn chunk_ranges(
    start: NaiveDate,
    end: NaiveDate,
    interval: ChunkInterval,
) -> Vec<(NaiveDate, NaiveDate)> {
    let mut ranges = Vec::new();
    let mut current = start;

    while current <= end {
        let chunk_end = match interval {
            ChunkInterval::Yearly => NaiveDate::from_ymd_opt(current.year(), 12, 31)
                .expect("Dec 31 always exists"),
            ChunkInterval::Monthly => last_day_of_month(current),
            ChunkInterval::Weekly => current + Duration::days(6),
            ChunkInterval::Daily => current,
        };

        ranges.push((current, chunk_end.min(end)));
        current = chunk_end + Duration::days(1);
    }

    ranges
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    // Jump past day 28 into next month, then step back to day 1 minus one.
    let pivot = NaiveDate::from_ymd_opt(date.year(), date.month(), 28).expect("day 28 exists")
        + Duration::days(4);
    NaiveDate::from_ymd_opt(pivot.year(), pivot.month(), 1).expect("day 1 exists")
        - Duration::days(1)
}

/// Inclusive epoch bounds of a date range: midnight at the start, end of
/// day at the end, interpreted as UTC (matching the backend's createdAt).
pub fn date_range_epochs(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let start_epoch = start
        .and_hms_opt(0, 0, 0)
        .expect("midnight exists")
        .and_utc()
        .timestamp();
    let end_epoch = end
        .and_hms_opt(23, 59, 59)
        .expect("end of day exists")
        .and_utc()
        .timestamp();
    (start_epoch, end_epoch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Week 1: Intro!", 80), "Week_1__Intro_");
        assert_eq!(sanitize_filename("abcdef", 3), "abc");
    }

    #[test]
    fn test_clean_source_filename() {
        assert_eq!(
            clean_source_filename("lecture_01 (Source).mp4"),
            "lecture_01.mp4"
        );
        assert_eq!(clean_source_filename("talk___.mp4"), "talk.mp4");
        assert_eq!(clean_source_filename("plain.mov"), "plain.mov");
    }

    #[test]
    fn test_timecode_validation() {
        assert!(is_valid_timecode("00:05:30"));
        assert!(is_valid_timecode("10:00:00"));
        assert!(!is_valid_timecode("0:05:30"));
        assert!(!is_valid_timecode("00:05"));
        assert!(!is_valid_timecode("00-05-30"));
        assert!(!is_valid_timecode(" 00:05:30"));
    }

    #[test]
    fn test_timecode_to_ms() {
        assert_eq!(timecode_to_ms("00:00:01").unwrap(), 1_000);
        assert_eq!(timecode_to_ms("00:05:30").unwrap(), 330_000);
        assert_eq!(timecode_to_ms("02:00:00").unwrap(), 7_200_000);
        assert!(timecode_to_ms("00:99:00").is_err());
        assert!(timecode_to_ms("bogus").is_err());
    }

    #[test]
    fn test_seconds_to_hhmmss() {
        assert_eq!(seconds_to_hhmmss(0), "0:00:00");
        assert_eq!(seconds_to_hhmmss(59), "0:00:59");
        assert_eq!(seconds_to_hhmmss(3661), "1:01:01");
        assert_eq!(seconds_to_hhmmss(86400), "24:00:00");
    }

    #[test]
    fn test_monthly_chunks_land_on_month_ends() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let ranges = chunk_ranges(start, end, ChunkInterval::Monthly);

        assert_eq!(
            ranges,
            vec![
                (
                    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
                ),
                (
                    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
                ),
                (
                    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
                ),
            ]
        );
    }

    #[test]
    fn test_daily_chunks_cover_every_day() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let ranges = chunk_ranges(start, end, ChunkInterval::Daily);
        assert_eq!(ranges.len(), 3);
        assert!(ranges.iter().all(|(a, b)| a == b));
    }

    #[test]
    fn test_yearly_chunk_caps_at_end() {
        let start = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let ranges = chunk_ranges(start, end, ChunkInterval::Yearly);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].1, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(ranges[1].1, end);
    }

    #[test]
    fn test_epoch_bounds() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let (start, end) = date_range_epochs(day, day);
        assert_eq!(end - start, 86_399);
    }

    #[test]
    fn test_format_epoch_in_timezone() {
        let tz = parse_tz("America/Los_Angeles").unwrap();
        // 2024-01-01 00:00:00 UTC is 2023-12-31 16:00:00 PT
        assert_eq!(format_epoch(1704067200, tz), "2023-12-31 16:00:00");
        assert!(parse_tz("Not/AZone").is_err());
    }
}
