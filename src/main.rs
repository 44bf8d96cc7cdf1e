use clap::{Parser, Subcommand};
use schedule_publisher::config::Config;
use schedule_publisher::document;
use schedule_publisher::logging;
use schedule_publisher::pipeline;
use schedule_publisher::publisher::{GitHubClient, Publisher};
use schedule_publisher::sheets::{fetch_schedule_rows, SheetsClient};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "schedule_publisher")]
#[command(about = "Converts spreadsheet schedule data into published JSON")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and transform, writing the local JSON artifact only
    Fetch,
    /// Run the full pipeline: fetch, transform, write, and publish
    Run {
        /// Skip the publish step entirely, even when committing is enabled
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Run failed: {e:#}");
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Fetch => {
            let payload = build_payload(&config).await?;
            document::write_local(&payload, &config.output.target_file)?;
            println!("💾 Wrote {}", config.output.target_file);
        }
        Commands::Run { dry_run } => {
            let payload = build_payload(&config).await?;

            if config.output.make_local_json {
                document::write_local(&payload, &config.output.target_file)?;
                println!("💾 Wrote {}", config.output.target_file);
            }

            if dry_run {
                println!("🚫 Dry run: skipping publish step");
                return Ok(());
            }

            println!("🚀 Publishing {}...", config.target_path());
            let store = GitHubClient::new(&config.github)?;
            let publisher = Publisher::new(&store, &config.github);
            let summary = publisher.publish(&config.target_path(), &payload).await?;

            info!("Publish finished");
            println!("\n📊 Publish results:");
            println!("   Created: {}", summary.created);
            println!("   Updated: {}", summary.updated);
            println!("   Unchanged: {}", summary.unchanged);
            println!("   Skipped: {}", summary.skipped);
        }
    }

    Ok(())
}

/// Fetches the source rows, runs both pipelines, and serializes the
/// document to its canonical byte form.
async fn build_payload(config: &Config) -> anyhow::Result<Vec<u8>> {
    println!("📡 Fetching worksheets...");
    let sheets = SheetsClient::new(&config.spreadsheet);
    let rows = fetch_schedule_rows(&sheets, &config.spreadsheet).await?;
    println!(
        "✅ Fetched {} timeblock rows and {} session rows",
        rows.timeblocks.len(),
        rows.sessions.len()
    );

    println!("🔧 Transforming rows...");
    let (schedule, summary) =
        pipeline::build_document(&rows.timeblocks, &rows.sessions, &config.columns);
    println!(
        "✅ Kept {} timeblocks ({} dropped), {} sessions ({} dropped)",
        summary.timeblocks_kept,
        summary.timeblocks_dropped,
        summary.sessions_kept,
        summary.sessions_dropped
    );

    Ok(document::to_canonical_json(&schedule)?)
}
