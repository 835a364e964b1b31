use clap::{Parser, Subcommand};
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};

use scholar_pipeline::app::ports::RankedOutputPort;
use scholar_pipeline::app::search_use_case::SearchUseCase;
use scholar_pipeline::config::PipelineConfig;
use scholar_pipeline::domain::{Profile, RawListing};
use scholar_pipeline::infra::ranked_output_adapter::{
    FileRankedOutputAdapter, StdoutRankedOutputAdapter,
};
use scholar_pipeline::logging::init_logging;
use scholar_pipeline::observability;
use scholar_pipeline::pipeline::pipeline::SearchPipeline;
use scholar_pipeline::pipeline::processing::deadline::SystemClock;
use scholar_pipeline::pipeline::processing::filters::ListingFilters;
use scholar_pipeline::pipeline::processing::score::ScoredListing;

#[derive(Parser)]
#[command(name = "scholar_pipeline")]
#[command(about = "Scholarship listing normalization, deduplication, and ranking pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over a batch of raw listings
    Process {
        /// Path to a JSON array of raw listings from the fetch layer
        #[arg(long)]
        input: String,
        /// Path to the requester profile JSON
        #[arg(long)]
        profile: String,
        /// Output NDJSON path; prints to stdout when omitted
        #[arg(long)]
        output: Option<String>,
        /// Pipeline config file
        #[arg(long, default_value = "config.toml")]
        config: String,
    },
    /// Apply secondary filters to previously ranked results
    Filter {
        /// Path to ranked results (NDJSON, as written by `process`)
        #[arg(long)]
        input: String,
        /// Output NDJSON path; prints to stdout when omitted
        #[arg(long)]
        output: Option<String>,
        /// Minimum funding amount mentioned in the funding text
        #[arg(long)]
        min_funding: Option<f64>,
        /// Keep only deadlines within this many days
        #[arg(long)]
        within_days: Option<i64>,
        /// Keyword to match in title/description/field (repeatable)
        #[arg(long)]
        keyword: Vec<String>,
        /// Substring match on the degree field
        #[arg(long)]
        degree: Option<String>,
        /// Substring match on the country field
        #[arg(long)]
        country: Option<String>,
    },
}

fn load_raw_listings(path: &str) -> Result<Vec<RawListing>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn load_profile(path: &str) -> Result<Profile, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn load_ranked(path: &str) -> Result<Vec<ScoredListing>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let trimmed = content.trim_start();
    // Accept both NDJSON (our own output) and a JSON array
    if trimmed.starts_with('[') {
        Ok(serde_json::from_str(&content)?)
    } else {
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Into::into))
            .collect()
    }
}

fn make_output_port(
    output: Option<&str>,
) -> Result<Arc<dyn RankedOutputPort>, Box<dyn std::error::Error>> {
    match output {
        Some(path) => Ok(Arc::new(FileRankedOutputAdapter::new(path)?)),
        None => Ok(Arc::new(StdoutRankedOutputAdapter)),
    }
}

async fn run_process(
    input: &str,
    profile_path: &str,
    output: Option<&str>,
    config_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load_or_default(config_path);
    let raw = load_raw_listings(input)?;
    let profile = load_profile(profile_path)?;

    info!(records = raw.len(), input, "loaded raw listings");

    let pipeline = SearchPipeline::new(config);
    let use_case = SearchUseCase::new(pipeline, make_output_port(output)?);
    let (records, summary) = use_case.run_search(raw, &profile).await?;

    println!("\n📊 Pipeline Results:");
    println!("   Input records:     {}", summary.input);
    println!("   Validated:         {}", summary.validated);
    println!("   Rejected as noise: {}", summary.rejected);
    println!("   Canonical records: {}", summary.canonical);
    println!("   Duplicates merged: {}", summary.duplicates_merged);
    println!("   Ranked output:     {}", records.len());
    if let Some(best) = records.first() {
        println!(
            "   Best match:        {} ({:.0}%)",
            best.listing.title, best.match_score
        );
    }

    Ok(())
}

async fn run_filter(
    input: &str,
    output: Option<&str>,
    filters: ListingFilters,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_ranked(input)?;
    let before = records.len();

    let kept = filters.apply(records, &SystemClock);
    println!("🔍 Filter kept {} of {} listings", kept.len(), before);

    let port = make_output_port(output)?;
    for record in &kept {
        port.write_ranked_listing(record).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging();

    if let Err(e) = observability::metrics::init() {
        warn!("Metrics recorder not installed: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            profile,
            output,
            config,
        } => {
            run_process(&input, &profile, output.as_deref(), &config).await?;
        }
        Commands::Filter {
            input,
            output,
            min_funding,
            within_days,
            keyword,
            degree,
            country,
        } => {
            let filters = ListingFilters {
                min_funding,
                max_deadline_days: within_days,
                keywords: keyword,
                degree,
                country,
            };
            run_filter(&input, output.as_deref(), filters).await?;
        }
    }

    Ok(())
}
