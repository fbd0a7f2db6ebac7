use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "equity-screener")]
#[command(about = "Extracts equities for one region from the Yahoo Finance screener into a CSV file")]
#[command(version)]
pub struct Args {
    /// Region to filter by, exactly as labelled in the screener (e.g. Argentina, Brazil)
    #[arg(short, long)]
    pub region: String,

    /// Path of the CSV file to write
    #[arg(short, long, default_value = "equities.csv")]
    pub output: PathBuf,

    /// Run the browser without a visible window
    #[arg(long)]
    pub headless: bool,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides the config file and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,
}
