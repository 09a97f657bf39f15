mod config;
mod pipeline;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use lyricmood_acquire::{harvest, lyrics, HttpFetcher, SlugOverrides};
use lyricmood_report::{ChartOptions, ReadmeOptions};
use lyricmood_sentiment::LanguageClient;
use pipeline::{AcquirePlan, ReportKind, ReportPlan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lyricmood")]
#[command(about = "Scrape song lyrics, score their sentiment, and report the results")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Config file (default: ./lyricmood.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dataset JSON file written by `acquire` and read by `report`
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// List the song titles found on the category page
    Titles {
        /// Wikipedia category name or listing URL
        #[arg(long)]
        category: Option<String>,
    },

    /// Print the lyrics URL a title maps to
    Slug {
        /// Song title as it appears on the category page
        title: String,
    },

    /// Harvest titles, fetch lyrics, score sentiment, and write the dataset
    Acquire(AcquireArgs),

    /// Generate CSV, charts, and README from the dataset
    Report(ReportArgs),

    /// Acquire, then report
    Run {
        #[command(flatten)]
        acquire: AcquireArgs,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args)]
struct AcquireArgs {
    /// Wikipedia category name (e.g., "Billie_Eilish_songs") or listing URL
    #[arg(long)]
    category: Option<String>,

    /// Service account key or API key JSON for the sentiment service
    #[arg(long, env = "LYRICMOOD_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Document language sent to the sentiment service
    #[arg(long)]
    language: Option<String>,

    /// Also archive the fetched lyrics as text files in this directory
    #[arg(long)]
    lyrics_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    /// Only generate one kind of report
    #[arg(long, value_enum)]
    only: Option<ReportKind>,

    /// CSV output path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Directory for per-song charts
    #[arg(long)]
    charts_dir: Option<PathBuf>,

    /// README output path
    #[arg(long)]
    readme: Option<PathBuf>,
}

impl AcquireArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(category) = self.category {
            config.category = category;
        }
        if let Some(credentials) = self.credentials {
            config.credentials = Some(credentials);
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(dir) = self.lyrics_dir {
            config.output.lyrics_dir = Some(dir);
        }
    }
}

impl ReportArgs {
    fn apply(self, config: &mut AppConfig) -> Option<ReportKind> {
        if let Some(csv) = self.csv {
            config.output.csv = csv;
        }
        if let Some(dir) = self.charts_dir {
            config.output.charts_dir = dir;
        }
        if let Some(readme) = self.readme {
            config.output.readme = readme;
        }
        self.only
    }
}

fn acquire_plan(config: &AppConfig) -> AcquirePlan {
    AcquirePlan {
        category_url: harvest::category_url(&config.category),
        url_template: config.lyrics_url_template.clone(),
        overrides: SlugOverrides::with_extra(&config.slug_overrides),
        lyrics_dir: config.output.lyrics_dir.clone(),
    }
}

fn report_plan(config: &AppConfig) -> ReportPlan {
    ReportPlan {
        csv: config.output.csv.clone(),
        charts_dir: config.output.charts_dir.clone(),
        readme: config.output.readme.clone(),
        chart_options: ChartOptions::default(),
        readme_options: ReadmeOptions {
            heading: config.readme.heading.clone(),
            chart_base_url: config.readme.chart_base_url.clone(),
            image_base_url: config.readme.image_base_url.clone(),
            generated_on: Some(chrono::Local::now().date_naive()),
        },
    }
}

async fn run_acquire(config: &AppConfig) -> Result<()> {
    let credentials = config.credentials_path()?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let mut analyzer = LanguageClient::from_credentials_file(credentials, &config.language)?;
    if let Some(endpoint) = &config.sentiment_endpoint {
        analyzer = analyzer.with_endpoint(endpoint);
    }

    let plan = acquire_plan(config);
    tracing::info!(
        category = %plan.category_url,
        language = %analyzer.language(),
        overrides = plan.overrides.len(),
        "Acquiring lyrics sentiment"
    );
    let results = pipeline::acquire(&fetcher, &analyzer, &plan).await?;
    lyricmood_model::store::write_dataset(&config.output.dataset, &results)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dataset) = cli.dataset {
        config.output.dataset = dataset;
    }

    match cli.command {
        Commands::Titles { category } => {
            if let Some(category) = category {
                config.category = category;
            }
            let fetcher = HttpFetcher::new(&config.user_agent)?;
            let url = harvest::category_url(&config.category);
            for title in harvest::harvest_titles(&fetcher, &url).await? {
                println!("{title}");
            }
        }
        Commands::Slug { title } => {
            let overrides = SlugOverrides::with_extra(&config.slug_overrides);
            let slug = lyrics::title_slug(&title, &overrides);
            println!("{}", lyrics::lyrics_url(&config.lyrics_url_template, &slug));
        }
        Commands::Acquire(args) => {
            args.apply(&mut config);
            run_acquire(&config).await?;
        }
        Commands::Report(args) => {
            let only = args.apply(&mut config);
            tracing::info!(dataset = %config.output.dataset.display(), "Generating reports");
            pipeline::report_from_dataset(&config.output.dataset, &report_plan(&config), only)?;
        }
        Commands::Run { acquire, report } => {
            acquire.apply(&mut config);
            let only = report.apply(&mut config);
            run_acquire(&config).await?;
            pipeline::report_from_dataset(&config.output.dataset, &report_plan(&config), only)?;
        }
    }

    Ok(())
}
