use analytics::{AnalysisPayload, AnalyticsEngine, BatchAnalysis, Prediction};
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{Config, LogFormat};
use dataset_store::{Dataset, NewDataset};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// The main entry point for the DataLens application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();
    let mut config = web_server::load_settings(Path::new(".env"))?;

    match cli.command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            let _guard = configuration::init_tracing(&config.logging)?;
            web_server::run_server(&config).await
        }
        Commands::Analyze(args) => {
            let _guard = configuration::init_tracing(&config.logging)?;
            handle_analyze(args, &config)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Upload tabular data, chart two columns, forecast and read generated reports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Analyse a dataset file once and print the reports.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind; overrides `server.host`.
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on; overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,

    /// Layout of log lines on stdout; overrides `logging.format`.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl ServeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// A JSON file shaped like an upload: `{name, columns, rows}`.
    #[arg(long)]
    file: PathBuf,

    /// The category or time column.
    #[arg(long)]
    x: String,

    /// The numeric value column.
    #[arg(long)]
    y: Option<String>,

    /// Also forecast this many periods ahead (requires `--y`).
    #[arg(long)]
    years: Option<i64>,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)?;
    let upload: NewDataset = serde_json::from_str(&raw)?;
    let dataset = Dataset::from_upload(upload)?;
    let series = dataset.series(&args.x, args.y.as_deref())?;
    tracing::info!(
        dataset = %dataset.name,
        samples = series.len(),
        "Analysing dataset."
    );

    let engine = AnalyticsEngine::new(config.analysis.clone());
    print_batch(&engine.analyze(&series));

    if let Some(years) = args.years {
        if args.y.is_none() {
            anyhow::bail!("--years needs a --y column to forecast");
        }
        let prediction = engine.predict(&series, years)?;
        print_prediction(&prediction);
    }
    Ok(())
}

fn print_batch(batch: &BatchAnalysis) {
    for report in &batch.reports {
        println!("\n{} {}. {}", report.icon, report.serial, report.title);

        let stats = report.analysis.statistics();
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Count", "Mean", "Median", "Std Dev", "Min", "Max"])
            .add_row(vec![
                stats.count.to_string(),
                format!("{:.2}", stats.mean),
                format!("{:.2}", stats.median),
                format!("{:.2}", stats.std_dev),
                format!("{:.2}", stats.min),
                format!("{:.2}", stats.max),
            ]);
        println!("{table}");

        if let AnalysisPayload::Pie(pie) = &report.analysis {
            let mut shares = Table::new();
            shares.load_preset(UTF8_FULL).set_header(vec!["Rank", "Category", "Value", "Share"]);
            for entry in &pie.distribution {
                shares.add_row(vec![
                    entry.rank.to_string(),
                    entry.category.clone(),
                    format!("{:.2}", entry.value),
                    entry.percentage.clone(),
                ]);
            }
            println!("{shares}");
        }

        for insight in report.analysis.key_insights() {
            println!("  - {}", insight);
        }
    }

    for failure in &batch.failures {
        println!("\n{} skipped: {}", failure.chart_type, failure.error);
    }
}

fn print_prediction(prediction: &Prediction) {
    let info = &prediction.model_info;
    println!(
        "\n{} Forecast: {} trend ({}), R² {:.3}",
        info.emoji, info.trend, info.change_rate, info.r2_score
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Step", "X", "Predicted Y"]);
    for point in &prediction.forecast {
        table.add_row(vec![
            point.step.to_string(),
            format!("{:.2}", point.x),
            format!("{:.2}", point.y),
        ]);
    }
    println!("{table}");
}
