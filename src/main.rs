//! Tariff simulator entry point: CLI wiring and config-driven report construction.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tariff_sim::config::ScenarioConfig;
use tariff_sim::io::export::export_csv;
use tariff_sim::report::SavingsReport;
use tariff_sim::runner::run_scenario;

/// Recover consumption from an electricity bill and estimate smart-appliance savings.
#[derive(Debug, Parser)]
#[command(name = "tariff-sim", version, long_about = None)]
struct Cli {
    /// Load scenario from TOML config file
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (standard, smartthings)
    #[arg(long)]
    preset: Option<String>,

    /// Total bill amount, overriding billing.total_bill
    #[arg(long)]
    bill: Option<f64>,

    /// Enable smart mode for an appliance (repeatable)
    #[arg(long = "enable", value_name = "APPLIANCE")]
    enable: Vec<String>,

    /// Billing period length in days
    #[arg(long)]
    days: Option<usize>,

    /// Export the daily trend to CSV
    #[arg(long, value_name = "PATH")]
    trend_out: Option<PathBuf>,

    /// Print the billing result as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Start REST API server after the calculation
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the scenario source and applies command-line overrides.
fn load_scenario(cli: &Cli) -> Result<ScenarioConfig, String> {
    // --scenario takes priority, then --preset, then the standard preset
    let mut scenario = if let Some(path) = &cli.scenario {
        ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string())?
    } else if let Some(name) = &cli.preset {
        ScenarioConfig::from_preset(name).map_err(|e| e.to_string())?
    } else {
        ScenarioConfig::standard()
    };

    if let Some(bill) = cli.bill {
        scenario.billing.total_bill = Some(bill);
    }
    if let Some(days) = cli.days {
        scenario.billing.days = days;
    }
    for name in &cli.enable {
        scenario.enable_appliance(name).map_err(|e| e.to_string())?;
    }
    Ok(scenario)
}

fn print_report(report: &SavingsReport, json: bool) -> Result<(), String> {
    if json {
        let body = serde_json::to_string_pretty(&report.billing)
            .map_err(|e| format!("failed to serialize result: {e}"))?;
        println!("{body}");
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), String> {
    let scenario = load_scenario(cli)?;

    #[cfg(feature = "api")]
    if cli.serve && scenario.billing.total_bill.is_none() {
        return serve(scenario, None, cli.port);
    }

    let report = run_scenario(&scenario).map_err(|e| e.to_string())?;
    print_report(&report, cli.json)?;

    if let Some(path) = &cli.trend_out {
        export_csv(&report.trend, path)
            .map_err(|e| format!("failed to write CSV \"{}\": {e}", path.display()))?;
        info!(path = %path.display(), "trend written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        return serve(scenario, Some(report), cli.port);
    }

    Ok(())
}

#[cfg(feature = "api")]
fn serve(scenario: ScenarioConfig, report: Option<SavingsReport>, port: u16) -> Result<(), String> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(tariff_sim::api::AppState { scenario, report });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to create tokio runtime: {e}"))?;
    rt.block_on(tariff_sim::api::serve(state, addr))
        .map_err(|e| format!("server error on {addr}: {e}"))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
