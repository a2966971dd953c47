use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use activity_qa::activities::{self, Selection};
use activity_qa::config;
use activity_qa::device::DeviceProfile;
use activity_qa::harness::{HarnessConfig, RunOutcome, parse_devices, run_harness, select};
use activity_qa::inspector::BrowserSession;

/// Activity QA - flags slide content overflowing its container
#[derive(Parser, Debug)]
#[command(
    name = "activity-qa",
    about = "Visual-regression QA runner for activity slides",
    args_conflicts_with_subcommands = true,
    after_help = "SELECTION:\n\
        N                          Test the activity at index N\n\
        N-M                        Test indices N through M (inclusive)\n\
        ID                         Test the activity with this ID\n\
        (none)                     Test every activity\n\n\
        ENVIRONMENT VARIABLES:\n\
        ACTIVITY_QA_BASE_URL        Activity URL prefix\n\
        ACTIVITY_QA_ACTIVITIES_FILE JSON list of activity IDs\n\
        ACTIVITY_QA_SCREENSHOTS_DIR Root for failure screenshots\n\
        ACTIVITY_QA_REPORTS_DIR     Directory for text reports\n\
        ACTIVITY_QA_TOLERANCE       Margin around the reference box (px)\n\
        ACTIVITY_QA_SIGNIFICANCE    Minimum overflow share to report (%)\n\
        ACTIVITY_QA_MIN_DIMENSION   Ignore elements smaller than this (px)\n\
        ACTIVITY_QA_HEADLESS        Run Chromium without a window\n\
        ACTIVITY_QA_DEVICES         Comma-separated device presets\n\
        RUST_LOG                    Log filter (default: info)"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Activity index, inclusive index range (N-M) or activity ID
    selection: Option<String>,

    /// Device preset or WxH viewport; repeat or comma-separate to test several devices
    #[arg(short, long = "device", env = "ACTIVITY_QA_DEVICES", value_delimiter = ',')]
    devices: Vec<String>,

    /// Test every device preset (overrides --device)
    #[arg(long)]
    all_devices: bool,

    /// Run Chromium without a window
    #[arg(long, env = "ACTIVITY_QA_HEADLESS", value_parser = BoolishValueParser::new())]
    headless: bool,

    /// Activity URL prefix
    #[arg(long, env = "ACTIVITY_QA_BASE_URL")]
    base_url: Option<String>,

    /// JSON list of activity IDs
    #[arg(long, env = "ACTIVITY_QA_ACTIVITIES_FILE")]
    activities: Option<PathBuf>,

    /// Root for failure screenshots
    #[arg(long, env = "ACTIVITY_QA_SCREENSHOTS_DIR")]
    screenshots: Option<PathBuf>,

    /// Directory for the text report
    #[arg(long, env = "ACTIVITY_QA_REPORTS_DIR")]
    reports: Option<PathBuf>,

    /// Margin around the reference box (px)
    #[arg(long, env = "ACTIVITY_QA_TOLERANCE")]
    tolerance: Option<f64>,

    /// Minimum overflow share to report (%)
    #[arg(long, env = "ACTIVITY_QA_SIGNIFICANCE")]
    significance: Option<f64>,

    /// Do not outline the reference container while testing
    #[arg(long)]
    no_highlight: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract activity IDs from a text or JSON dump into an activity list
    Extract {
        /// File to scan for activity IDs
        #[arg(short, long, default_value = "paths.json")]
        input: PathBuf,

        /// Activity list to write
        #[arg(short, long, default_value = "activities.json")]
        output: PathBuf,
    },

    /// List the device presets
    Devices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match args.command {
        Some(Commands::Extract { input, output }) => {
            let count = activities::extract_to_file(&input, &output)
                .with_context(|| format!("extracting activity IDs from {}", input.display()))?;
            println!("Extracted {} activity IDs into {}", count, output.display());
        }
        Some(Commands::Devices) => {
            for device in DeviceProfile::all_presets() {
                println!(
                    "{:<20} {}x{} @{}x{}",
                    device.name,
                    device.viewport.width,
                    device.viewport.height,
                    device.device_scale_factor,
                    if device.is_mobile { " (mobile)" } else { "" }
                );
            }
        }
        None => run(args.run).await?,
    }

    Ok(())
}

fn harness_config(args: &RunArgs) -> anyhow::Result<HarnessConfig> {
    let mut harness = HarnessConfig::from_config(config::get())?;

    if let Some(base_url) = &args.base_url {
        harness.base_url = base_url.clone();
    }
    if let Some(dir) = &args.screenshots {
        harness.screenshots_dir = dir.clone();
    }
    if let Some(dir) = &args.reports {
        harness.reports_dir = dir.clone();
    }
    if let Some(tolerance) = args.tolerance {
        harness.detector.tolerance = tolerance;
    }
    if let Some(significance) = args.significance {
        harness.detector.significance_threshold = significance;
    }
    harness.highlight = !args.no_highlight;

    if args.all_devices {
        harness.devices = DeviceProfile::all_presets();
    } else if !args.devices.is_empty() {
        harness.devices = parse_devices(&args.devices)?;
    }

    Ok(harness)
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let harness = harness_config(&args)?;
    let headless = args.headless || config::get().browser.headless;

    let activities_file = args
        .activities
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::activities_file()));
    let ids = activities::load_activities(&activities_file);

    let selection = match &args.selection {
        Some(token) => token.parse::<Selection>()?,
        None => Selection::All,
    };
    // Before launch: an unknown ID must leave no report behind
    let selected = select(&selection, &ids)?;

    let browser = BrowserSession::launch(headless)
        .await
        .context("launching Chromium")?;
    let outcome = run_harness(&browser, &harness, &selected).await;
    if let Err(err) = browser.shutdown().await {
        warn!(error = %err, "browser did not shut down cleanly");
    }
    let outcome = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome);
    }

    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    println!("\nSUMMARY:");
    println!("  Total activities:  {}", outcome.summary.total_activities);
    println!("  Passed activities: {}", outcome.summary.passed_activities);
    println!("  Failed activities: {}", outcome.summary.failed_activities);
    for verdict in &outcome.verdicts {
        println!("  {} --> QA {}", verdict.activity_id, verdict.status);
    }
    println!("\nReport: {}", outcome.report_path.display());
}
