use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::data_models::JobSummary;
use crate::extract::{Extractor, selector};

pub const SALARY_NOT_SPECIFIED: &str = "Not specified";

struct ListingRules {
    item: Selector,
    position: Extractor,
    company: Extractor,
    location: Extractor,
    date: Extractor,
    salary: Extractor,
    job_url: Extractor,
    company_logo: Extractor,
    ago_time: Extractor,
}

static RULES: Lazy<ListingRules> = Lazy::new(|| ListingRules {
    item: selector("li"),
    position: Extractor::text(".base-search-card__title"),
    company: Extractor::text(".base-search-card__subtitle"),
    location: Extractor::text(".job-search-card__location"),
    date: Extractor::attr("time", "datetime"),
    salary: Extractor::text(".job-search-card__salary-info"),
    job_url: Extractor::attr(".base-card__full-link", "href"),
    company_logo: Extractor::attr(".artdeco-entity-image", "data-delayed-url"),
    ago_time: Extractor::text(".job-search-card__listdate"),
});

/// Parse one listing page into job summaries.
///
/// Each field is read independently; a missing field becomes an empty string,
/// except salary, which is "Not specified" only when its element is absent.
/// Items without both a position and a company are skipped.
pub fn parse_listing(html: &str) -> Vec<JobSummary> {
    let document = Html::parse_document(html);
    let mut jobs = Vec::new();
    for (idx, item) in document.select(&RULES.item).enumerate() {
        match parse_item(item) {
            Some(job) => jobs.push(job),
            None => debug!("skipping listing item #{idx}: missing position or company"),
        }
    }
    jobs
}

fn parse_item(item: ElementRef) -> Option<JobSummary> {
    let field = |ex: &Extractor| ex.extract(item).unwrap_or_default();

    let position = field(&RULES.position);
    let company = field(&RULES.company);
    if position.is_empty() || company.is_empty() {
        return None;
    }

    Some(JobSummary {
        position,
        company,
        location: field(&RULES.location),
        date: field(&RULES.date),
        salary: if RULES.salary.is_present(item) {
            field(&RULES.salary)
        } else {
            SALARY_NOT_SPECIFIED.to_string()
        },
        job_url: field(&RULES.job_url),
        company_logo: field(&RULES.company_logo),
        ago_time: field(&RULES.ago_time),
    })
}
