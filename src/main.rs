use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use jobharvest::api::create_router;
use jobharvest::config::CONFIG;
use jobharvest::data_models::{
    ExperienceLevel, JobType, MinSalary, PostingAge, RemoteMode, SearchRequest, SortBy, WireCode,
};
use jobharvest::engine::JobEngine;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobharvest", about = "Job listing search and posting scraper")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Address to bind, defaults to JOBHARVEST_BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one search and print the postings as JSON
    Search(SearchArgs),
    /// Scrape one posting page and print it as JSON
    Detail { url: String },
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, default_value = "")]
    keyword: String,
    #[arg(long, default_value = "")]
    location: String,
    /// 24hr, past week or past month
    #[arg(long)]
    posted: Option<String>,
    /// full time, part time, contract, temporary, volunteer or internship
    #[arg(long)]
    job_type: Option<String>,
    /// on-site, remote or hybrid
    #[arg(long)]
    remote: Option<String>,
    /// 40000, 60000, 80000, 100000 or 120000
    #[arg(long)]
    salary: Option<String>,
    /// internship, entry level, associate, senior, director or executive
    #[arg(long)]
    experience: Option<String>,
    /// recent or relevant
    #[arg(long)]
    sort: Option<String>,
    /// 0 fetches every page
    #[arg(long, default_value_t = 0)]
    limit: usize,
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long)]
    verified: bool,
    #[arg(long)]
    low_competition: bool,
}

fn label<T: WireCode>(value: Option<&str>) -> Option<T> {
    value.and_then(T::from_label)
}

impl From<SearchArgs> for SearchRequest {
    fn from(args: SearchArgs) -> Self {
        SearchRequest {
            posting_age: label::<PostingAge>(args.posted.as_deref()),
            job_type: label::<JobType>(args.job_type.as_deref()),
            remote_mode: label::<RemoteMode>(args.remote.as_deref()),
            salary: label::<MinSalary>(args.salary.as_deref()),
            experience_level: label::<ExperienceLevel>(args.experience.as_deref()),
            sort_by: label::<SortBy>(args.sort.as_deref()),
            keyword: args.keyword,
            location: args.location,
            limit: args.limit,
            page: args.page,
            verified_only: args.verified,
            low_competition_only: args.low_competition,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let engine = JobEngine::new(&CONFIG).context("failed to build job engine")?;

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| CONFIG.bind_addr.clone());
            let app = create_router(Arc::new(engine));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tracing::info!("listening on {addr}");
            axum::serve(listener, app).await?;
        }
        Command::Search(args) => {
            let request = SearchRequest::from(args);
            let jobs = engine.search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&*jobs)?);
        }
        Command::Detail { url } => {
            let detail = engine.fetch_detail(&url).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
    }
    Ok(())
}
