use clap::Parser;
use equity_screener::{Screener, ScreenerConfig, export};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ScreenerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ScreenerConfig::default(),
    };

    let mut screener = Screener::new(&args.region).with_config(config.apply_env());
    if args.headless {
        screener = screener.with_headless(true);
    }
    if let Some(url) = args.webdriver_url {
        screener = screener.with_webdriver_url(url);
    }

    ::log::info!(
        "Extracting equities for region {} (WebDriver at {})",
        args.region,
        screener.config().webdriver_url
    );
    let start_time = std::time::Instant::now();

    let equities = match screener.fetch().await {
        Ok(equities) => equities,
        Err(e) => {
            ::log::error!("Extraction failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Found {} equities in {:.2} seconds",
        equities.len(),
        start_time.elapsed().as_secs_f64()
    );

    if let Err(e) = export::export_csv(&equities, &args.output) {
        ::log::error!("Failed to write {}: {}", args.output.display(), e);
        return ExitCode::FAILURE;
    }

    ::log::info!("Exported to {}", args.output.display());
    ExitCode::SUCCESS
}
