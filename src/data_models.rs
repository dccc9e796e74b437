use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A friendly categorical search option that maps onto a listing wire code.
pub trait WireCode: Sized + Copy {
    /// Case-insensitive lookup of a user supplied label. Unknown labels yield `None`.
    fn from_label(label: &str) -> Option<Self>;
    fn wire_code(&self) -> &'static str;
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingAge {
    Past24Hours,
    PastWeek,
    PastMonth,
}

impl WireCode for PostingAge {
    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "24hr" | "24h" | "past 24 hours" => Some(Self::Past24Hours),
            "past week" => Some(Self::PastWeek),
            "past month" => Some(Self::PastMonth),
            _ => None,
        }
    }

    fn wire_code(&self) -> &'static str {
        match self {
            Self::Past24Hours => "r86400",
            Self::PastWeek => "r604800",
            Self::PastMonth => "r2592000",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Volunteer,
    Internship,
}

impl WireCode for JobType {
    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "full time" | "full-time" => Some(Self::FullTime),
            "part time" | "part-time" => Some(Self::PartTime),
            "contract" => Some(Self::Contract),
            "temporary" => Some(Self::Temporary),
            "volunteer" => Some(Self::Volunteer),
            "internship" => Some(Self::Internship),
            _ => None,
        }
    }

    fn wire_code(&self) -> &'static str {
        match self {
            Self::FullTime => "F",
            Self::PartTime => "P",
            Self::Contract => "C",
            Self::Temporary => "T",
            Self::Volunteer => "V",
            Self::Internship => "I",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMode {
    OnSite,
    Remote,
    Hybrid,
}

impl WireCode for RemoteMode {
    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "on-site" | "on site" => Some(Self::OnSite),
            "remote" => Some(Self::Remote),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    fn wire_code(&self) -> &'static str {
        match self {
            Self::OnSite => "1",
            Self::Remote => "2",
            Self::Hybrid => "3",
        }
    }
}

/// Minimum yearly salary tiers the listing endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinSalary {
    K40,
    K60,
    K80,
    K100,
    K120,
}

impl MinSalary {
    pub fn from_amount(amount: u64) -> Option<Self> {
        match amount {
            40_000 => Some(Self::K40),
            60_000 => Some(Self::K60),
            80_000 => Some(Self::K80),
            100_000 => Some(Self::K100),
            120_000 => Some(Self::K120),
            _ => None,
        }
    }
}

impl WireCode for MinSalary {
    /// Accepts "100000", "100,000" or "$100000".
    fn from_label(label: &str) -> Option<Self> {
        let digits: String = label
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        digits.parse().ok().and_then(Self::from_amount)
    }

    fn wire_code(&self) -> &'static str {
        match self {
            Self::K40 => "1",
            Self::K60 => "2",
            Self::K80 => "3",
            Self::K100 => "4",
            Self::K120 => "5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Internship,
    EntryLevel,
    Associate,
    Senior,
    Director,
    Executive,
}

impl WireCode for ExperienceLevel {
    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "internship" => Some(Self::Internship),
            "entry level" => Some(Self::EntryLevel),
            "associate" => Some(Self::Associate),
            "senior" => Some(Self::Senior),
            "director" => Some(Self::Director),
            "executive" => Some(Self::Executive),
            _ => None,
        }
    }

    fn wire_code(&self) -> &'static str {
        match self {
            Self::Internship => "1",
            Self::EntryLevel => "2",
            Self::Associate => "3",
            Self::Senior => "4",
            Self::Director => "5",
            Self::Executive => "6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Recent,
    Relevant,
}

impl WireCode for SortBy {
    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "recent" => Some(Self::Recent),
            "relevant" => Some(Self::Relevant),
            _ => None,
        }
    }

    fn wire_code(&self) -> &'static str {
        match self {
            Self::Recent => "DD",
            Self::Relevant => "R",
        }
    }
}

/// Decodes a categorical field from free text (or a bare number), mapping
/// anything unrecognised to `None` instead of failing the whole request.
fn lenient_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: WireCode,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => T::from_label(&s),
        Some(Value::Number(n)) => T::from_label(&n.to_string()),
        _ => None,
    })
}

/// A job search as the caller phrases it. `None` on a categorical field means
/// "no filter"; `limit == 0` means "every page until the source runs dry".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub keyword: String,
    pub location: String,
    #[serde(alias = "date_since_posted", deserialize_with = "lenient_label")]
    pub posting_age: Option<PostingAge>,
    #[serde(deserialize_with = "lenient_label")]
    pub job_type: Option<JobType>,
    #[serde(alias = "remote_filter", deserialize_with = "lenient_label")]
    pub remote_mode: Option<RemoteMode>,
    #[serde(deserialize_with = "lenient_label")]
    pub salary: Option<MinSalary>,
    #[serde(deserialize_with = "lenient_label")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(deserialize_with = "lenient_label")]
    pub sort_by: Option<SortBy>,
    pub limit: usize,
    pub page: u32,
    #[serde(alias = "has_verification")]
    pub verified_only: bool,
    #[serde(alias = "under_10_applicants")]
    pub low_competition_only: bool,
}

impl SearchRequest {
    pub fn new(keyword: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

static JOB_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-(\d+)(?:\?|/|$)").expect("job id pattern is valid"));

/// Trailing numeric id of a posting URL,
/// e.g. `.../jobs/view/backend-engineer-at-acme-4319344438?trk=x` -> `4319344438`.
pub fn job_id_from_url(url: &str) -> Option<String> {
    JOB_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// One entry of a listing page.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct JobSummary {
    pub position: String,
    pub company: String,
    pub location: String,
    /// Machine readable posting date as published, e.g. `2024-05-01`.
    pub date: String,
    pub salary: String,
    pub job_url: String,
    pub company_logo: String,
    /// Human readable age, e.g. `3 days ago`.
    pub ago_time: String,
}

impl JobSummary {
    pub fn job_id(&self) -> Option<String> {
        job_id_from_url(&self.job_url)
    }
}

/// Everything scraped from a single posting page. Every field may be empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JobDetail {
    pub title: String,
    pub company: String,
    pub location: String,
    /// `YYYY-MM-DD`, or empty when no date could be inferred.
    pub posted_date: String,
    /// Normalised phrase such as `25 applicants` or `100+ applicants`.
    pub applicant_count: String,
    pub description: String,
    pub salary: String,
    pub employment_type: String,
    pub seniority_level: String,
    pub job_function: String,
    pub industries: String,
    pub company_logo: String,
    pub company_size: String,
    pub benefits: String,
    pub skills: Vec<String>,
    pub job_url: String,
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_case_insensitive() {
        assert_eq!(PostingAge::from_label("Past Week"), Some(PostingAge::PastWeek));
        assert_eq!(JobType::from_label(" FULL-TIME "), Some(JobType::FullTime));
        assert_eq!(RemoteMode::from_label("On Site"), Some(RemoteMode::OnSite));
        assert_eq!(SortBy::from_label("Relevant"), Some(SortBy::Relevant));
    }

    #[test]
    fn test_unknown_labels_are_none() {
        assert_eq!(PostingAge::from_label("invalid"), None);
        assert_eq!(JobType::from_label(""), None);
        assert_eq!(ExperienceLevel::from_label("wizard"), None);
        assert_eq!(MinSalary::from_label("55000"), None);
    }

    #[test]
    fn test_salary_accepts_formatted_amounts() {
        assert_eq!(MinSalary::from_label("100000"), Some(MinSalary::K100));
        assert_eq!(MinSalary::from_label("$120,000"), Some(MinSalary::K120));
        assert_eq!(MinSalary::K100.wire_code(), "4");
    }

    #[test]
    fn test_search_request_decodes_leniently() {
        let req: SearchRequest = serde_json::from_str(
            r#"{
                "keyword": "rust developer",
                "date_since_posted": "past week",
                "job_type": "banana",
                "salary": 100000,
                "remote_filter": "remote",
                "limit": 5,
                "has_verification": true
            }"#,
        )
        .unwrap();
        assert_eq!(req.keyword, "rust developer");
        assert_eq!(req.posting_age, Some(PostingAge::PastWeek));
        assert_eq!(req.job_type, None);
        assert_eq!(req.salary, Some(MinSalary::K100));
        assert_eq!(req.remote_mode, Some(RemoteMode::Remote));
        assert_eq!(req.limit, 5);
        assert!(req.verified_only);
        assert!(!req.low_competition_only);
    }

    #[test]
    fn test_job_id_from_url() {
        assert_eq!(
            job_id_from_url(
                "https://www.linkedin.com/jobs/view/backend-software-engineer-at-login-works-4319344438"
            ),
            Some("4319344438".to_string())
        );
        assert_eq!(
            job_id_from_url("https://www.linkedin.com/jobs/view/engineer-at-acme-123?trk=guest"),
            Some("123".to_string())
        );
        assert_eq!(job_id_from_url("https://www.linkedin.com/jobs/"), None);
        assert_eq!(JobSummary::default().job_id(), None);
    }
}
