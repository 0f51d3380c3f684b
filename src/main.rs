use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use runboard::config::{CiContext, Config};
use runboard::dashboard::source::{FileSource, HttpSource, ManifestSource};
use runboard::manifest::Manifest;

#[derive(Parser)]
#[command(
    name = "runboard",
    about = "CI test-run history dashboard generator",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest one run's raw results into the manifest
    Ingest {
        /// Path to the raw JSON results file
        #[arg(default_value = "playwright-report/data.json")]
        results: PathBuf,

        /// Deploy directory holding reports/manifest.json
        #[arg(default_value = "deploy")]
        out_dir: PathBuf,
    },

    /// Render the dashboard page from the manifest
    Render {
        /// Deploy directory to write index.html into
        #[arg(default_value = "deploy")]
        out_dir: PathBuf,

        /// Fetch the manifest from a URL instead of the deploy directory
        #[arg(long)]
        url: Option<String>,
    },

    /// Serve the deploy directory locally for preview
    Serve {
        /// Deploy directory to serve
        #[arg(default_value = "deploy")]
        dir: PathBuf,

        /// Bind address (overrides the config file)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the run history from the manifest
    History {
        /// Deploy directory holding reports/manifest.json
        #[arg(default_value = "deploy")]
        dir: PathBuf,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default();

    match cli.command {
        Commands::Ingest { results, out_dir } => {
            let ctx = CiContext::from_env();
            tracing::info!(
                results = %results.display(),
                run_number = ctx.run_number,
                "ingesting run results"
            );

            let summary = runboard::ingest_run(&results, &out_dir, &ctx)?;

            if !summary.evicted.is_empty() {
                println!("Removed {} old report(s) from manifest", summary.evicted.len());
                for (run_number, date) in &summary.evicted {
                    println!("  - Run #{} from {}", run_number, date);
                }
            }
            println!("✓ Manifest generated with {} report(s)", summary.report_count);
            println!(
                "✓ Latest run #{}: {}/{} passed ({}%)",
                summary.run_number,
                summary.stats.passed,
                summary.stats.total,
                summary.stats.pass_rate
            );
        }
        Commands::Render { out_dir, url } => {
            let source: Box<dyn ManifestSource> = match url {
                Some(url) => Box::new(HttpSource::new(url)),
                None => Box::new(FileSource::new(out_dir.join("reports/manifest.json"))),
            };

            runboard::render_dashboard(source.as_ref(), &config, &out_dir).await?;
            println!("✓ Dashboard written to {}", out_dir.join("index.html").display());
        }
        Commands::Serve { dir, bind } => {
            let bind = bind.unwrap_or(config.server.bind);
            tracing::info!(%bind, dir = %dir.display(), "starting preview server");
            runboard::server::serve(&bind, dir).await?;
        }
        Commands::History { dir, json } => {
            let manifest = Manifest::load(&dir.join("reports/manifest.json"));

            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else if manifest.reports.is_empty() {
                println!("No runs recorded yet.");
            } else {
                println!(
                    "{:<8} | {:<14} | {:<9} | {:<7} | {:<6} | {:<6} | Pass rate",
                    "Run", "Date", "Time", "Passed", "Failed", "Flaky"
                );
                println!(
                    "{:-<8}-|-{:-<14}-|-{:-<9}-|-{:-<7}-|-{:-<6}-|-{:-<6}-|-{:-<9}",
                    "", "", "", "", "", "", ""
                );
                for report in &manifest.reports {
                    println!(
                        "#{:<7} | {:<14} | {:<9} | {:<7} | {:<6} | {:<6} | {}%",
                        report.run_number,
                        report.date,
                        report.time,
                        report.stats.passed,
                        report.stats.failed,
                        report.stats.flaky,
                        report.stats.pass_rate
                    );
                }
                if let Some(trends) = manifest.trends {
                    println!(
                        "\nTrend vs previous run: pass rate {:+}%, total {:+}",
                        trends.pass_rate, trends.total
                    );
                }
            }
        }
    }

    Ok(())
}
