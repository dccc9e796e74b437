//! Posted date and applicant count of a posting page.
//!
//! Both come from free text ("3 days ago", "Be among the first 25
//! applicants") that changes shape often, so each is read from its dedicated
//! element first and from broader fallbacks after that. Nothing in here
//! fails: an unrecognised page yields empty fields.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::debug;

use crate::extract::{Extractor, clean_text, first_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgeUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl AgeUnit {
    /// Months count as 30 days and years as 365.
    fn span(self, n: i64) -> Option<TimeDelta> {
        match self {
            AgeUnit::Hour => TimeDelta::try_hours(n),
            AgeUnit::Day => TimeDelta::try_days(n),
            AgeUnit::Week => TimeDelta::try_weeks(n),
            AgeUnit::Month => TimeDelta::try_days(n.checked_mul(30)?),
            AgeUnit::Year => TimeDelta::try_days(n.checked_mul(365)?),
        }
    }
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).unwrap_or_else(|e| panic!("invalid built-in pattern {re:?}: {e}"))
}

// Checked in this order; the first match wins.
static AGE_PATTERNS: Lazy<Vec<(Regex, AgeUnit)>> = Lazy::new(|| {
    vec![
        (pattern(r"(?i)(\d+)\s+hours?\s+ago"), AgeUnit::Hour),
        (pattern(r"(?i)(\d+)\s+days?\s+ago"), AgeUnit::Day),
        (pattern(r"(?i)(\d+)\s+weeks?\s+ago"), AgeUnit::Week),
        (pattern(r"(?i)(\d+)\s+months?\s+ago"), AgeUnit::Month),
        (pattern(r"(?i)(\d+)\s+years?\s+ago"), AgeUnit::Year),
    ]
});

// Checked in this order; the first match wins. Group 1 is the count.
static APPLICANT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        pattern(r"(?i)(\d+)\s+people?\s+clicked?\s+apply"),
        pattern(r"(?i)(\d+)\s+applicants?"),
        pattern(r"(?i)be\s+among\s+the\s+first\s+(\d+)"),
        pattern(r"(?i)(\d+)\+?\s+applicants?"),
    ]
});

pub const OVER_HUNDRED_APPLICANTS: &str = "100+ applicants";

struct MetadataRules {
    posted: Vec<Extractor>,
    posted_fallback: Extractor,
    caption: Vec<Extractor>,
}

static RULES: Lazy<MetadataRules> = Lazy::new(|| MetadataRules {
    posted: vec![Extractor::text("span.posted-time-ago__text")],
    posted_fallback: Extractor::attr("time", "datetime"),
    caption: vec![
        Extractor::text("figcaption.num-applicants__caption"),
        Extractor::text("span.num-applicants__caption"),
    ],
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobMetadata {
    /// `YYYY-MM-DD` or empty.
    pub posted_date: String,
    pub applicant_count: String,
}

/// Calendar date `text` refers to, counted back from `now`.
pub fn posted_date_from_text(text: &str, now: NaiveDateTime) -> Option<NaiveDate> {
    let (caps, unit) = AGE_PATTERNS
        .iter()
        .find_map(|(re, unit)| re.captures(text).map(|caps| (caps, *unit)))?;
    let n: i64 = caps[1].parse().ok()?;
    now.checked_sub_signed(unit.span(n)?).map(|dt| dt.date())
}

/// Normalised applicant count, e.g. `"25 applicants"`.
///
/// Any mention of `100+` or `over 100` overrides whatever the ordered
/// patterns found.
pub fn applicant_count_from_text(text: &str) -> Option<String> {
    let mut count = first_applicant_match(text);
    let lower = text.to_lowercase();
    if lower.contains("100+") || lower.contains("over 100") {
        count = Some(OVER_HUNDRED_APPLICANTS.to_string());
    }
    count
}

fn first_applicant_match(text: &str) -> Option<String> {
    APPLICANT_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| format!("{} applicants", &caps[1]))
}

pub fn parse_metadata(document: &Html, now: NaiveDateTime) -> JobMetadata {
    let root = document.root_element();

    let posted_date = first_of(&RULES.posted, root)
        .and_then(|text| posted_date_from_text(&text, now))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .or_else(|| {
            debug!("no relative posted time, falling back to <time datetime>");
            RULES.posted_fallback.extract(root)
        })
        .unwrap_or_default();

    let applicant_count = match first_of(&RULES.caption, root) {
        // an unrecognised caption is still better than nothing
        Some(caption) => applicant_count_from_text(&caption).unwrap_or(caption),
        None => {
            debug!("no applicant caption, scanning page text");
            first_applicant_match(&clean_text(root)).unwrap_or_default()
        }
    };

    JobMetadata {
        posted_date,
        applicant_count,
    }
}
