use chrono::{DateTime, Local, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

use crate::data_models::JobDetail;
use crate::extract::{Extractor, clean_text, first_of, selector};
use crate::metadata::parse_metadata;

/// Field extractors for a posting page. Each field lists its selectors in
/// the order they are tried.
struct DetailRules {
    title: Vec<Extractor>,
    company: Vec<Extractor>,
    location: Vec<Extractor>,
    description: Vec<Extractor>,
    salary: Vec<Extractor>,
    company_logo: Vec<Extractor>,
    company_size: Vec<Extractor>,
    benefits: Vec<Extractor>,
    skill: Selector,
    criteria_item: Selector,
    criteria_label: Selector,
    criteria_text: Selector,
}

static RULES: Lazy<DetailRules> = Lazy::new(|| DetailRules {
    title: vec![
        Extractor::text("h1.top-card-layout__title"),
        Extractor::text("h1.topcard__title"),
    ],
    company: vec![
        Extractor::text("a.topcard__org-name-link"),
        Extractor::text("span.topcard__flavor--black-link"),
    ],
    location: vec![Extractor::text("span.topcard__flavor--bullet")],
    description: vec![
        Extractor::text("div.show-more-less-html__markup"),
        Extractor::text("div.description__text"),
    ],
    salary: vec![
        Extractor::text("span.salary"),
        Extractor::sole_text_containing("div", "$"),
    ],
    company_logo: vec![
        Extractor::attr("img.topcard__org-logo", "src"),
        Extractor::attr("img.topcard__org-logo", "data-delayed-url"),
    ],
    company_size: vec![Extractor::text("dd.topcard__flavor--metadata")],
    benefits: vec![Extractor::text("div.benefits")],
    skill: selector("span.job-details-skill-pill__text"),
    criteria_item: selector("li.description__job-criteria-item"),
    criteria_label: selector("h3.description__job-criteria-subheader"),
    criteria_text: selector("span.description__job-criteria-text"),
});

#[derive(Debug, Default)]
struct Criteria {
    employment_type: String,
    seniority_level: String,
    job_function: String,
    industries: String,
}

/// The criteria block is read by its sub-header labels when present and by
/// position otherwise (employment type, seniority, function, industries).
fn parse_criteria(root: ElementRef) -> Criteria {
    let labelled: HashMap<String, String> = root
        .select(&RULES.criteria_item)
        .filter_map(|item| {
            let label = item.select(&RULES.criteria_label).next().map(clean_text)?;
            let value = item.select(&RULES.criteria_text).next().map(clean_text)?;
            Some((label.to_lowercase(), value))
        })
        .collect();
    let positional: Vec<String> = root
        .select(&RULES.criteria_text)
        .map(clean_text)
        .collect();

    let pick = |label: &str, idx: usize| {
        labelled
            .get(label)
            .or_else(|| positional.get(idx))
            .cloned()
            .unwrap_or_default()
    };

    Criteria {
        employment_type: pick("employment type", 0),
        seniority_level: pick("seniority level", 1),
        job_function: pick("job function", 2),
        industries: pick("industries", 3),
    }
}

fn field(rules: &[Extractor], root: ElementRef) -> String {
    first_of(rules, root).unwrap_or_default()
}

pub fn parse_job_detail(html: &str, job_url: &str) -> JobDetail {
    parse_job_detail_at(html, job_url, Local::now())
}

/// Parse a posting page, resolving relative posting times against `now`.
pub fn parse_job_detail_at(html: &str, job_url: &str, now: DateTime<Local>) -> JobDetail {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let metadata = parse_metadata(&document, now.naive_local());
    let criteria = parse_criteria(root);
    let skills = root
        .select(&RULES.skill)
        .map(clean_text)
        .filter(|s| !s.is_empty())
        .collect();

    JobDetail {
        title: field(&RULES.title, root),
        company: field(&RULES.company, root),
        location: field(&RULES.location, root),
        posted_date: metadata.posted_date,
        applicant_count: metadata.applicant_count,
        description: field(&RULES.description, root),
        salary: field(&RULES.salary, root),
        employment_type: criteria.employment_type,
        seniority_level: criteria.seniority_level,
        job_function: criteria.job_function,
        industries: criteria.industries,
        company_logo: field(&RULES.company_logo, root),
        company_size: field(&RULES.company_size, root),
        benefits: field(&RULES.benefits, root),
        skills,
        job_url: job_url.to_string(),
        scraped_at: now.with_timezone(&Utc),
    }
}
