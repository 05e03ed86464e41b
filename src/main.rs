use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

use sleep_reports::app::App;
use sleep_reports::config::Config;
use sleep_reports::context::ReportsContext;
use sleep_reports::logging;
use sleep_reports::reports::generator::{RandomReports, ReportGenerator};
use sleep_reports::ui::views::ReportListView;

#[derive(Parser, Debug)]
#[command(name = "sleep-reports")]
#[command(about = "Terminal dashboard for sleep status reports")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/sleep-reports/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Seed for the report generator, for reproducible runs
  #[arg(short, long)]
  seed: Option<u64>,

  /// Print the reports as JSON and exit instead of starting the UI
  #[arg(long)]
  dump: bool,

  /// Number of generated reports to add before dumping
  #[arg(long, default_value_t = 0, requires = "dump")]
  add: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = Config::load(args.config.as_deref())?;

  // Command line wins over the config file
  if args.seed.is_some() {
    config.generator.seed = args.seed;
  }

  let _log_guard = logging::init(&config.log)?;
  info!(version = env!("CARGO_PKG_VERSION"), "starting");

  let context = ReportsContext::from_config(&config)?;
  let mut generator = RandomReports::from_seed(config.generator.seed);

  if args.dump {
    for _ in 0..args.add {
      context.add_report.run(generator.generate()).await?;
    }
    let reports = context.store.list().await;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    return Ok(());
  }

  let root = ReportListView::new(&context, Box::new(generator));
  let mut app = App::new(Box::new(root), config.title(), config.tick_rate());
  app.run().await?;

  Ok(())
}
