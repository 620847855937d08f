//! Scenario-to-report pipeline shared by the CLI and the API.

use tracing::info;

use crate::config::ScenarioConfig;
use crate::error::RunError;
use crate::report::SavingsReport;

/// Validates `scenario`, builds its engine, and computes the savings report
/// for its bill.
///
/// # Errors
///
/// Returns `RunError::Config` with every validation failure,
/// `RunError::MissingBill` when no bill amount is set, or
/// `RunError::Invalid` if the engine rejects the input.
pub fn run_scenario(scenario: &ScenarioConfig) -> Result<SavingsReport, RunError> {
    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(RunError::Config(errors));
    }
    let total_bill = scenario.billing.total_bill.ok_or(RunError::MissingBill)?;
    let engine = scenario.to_engine()?;

    let enabled: Vec<&str> = scenario
        .appliances
        .iter()
        .filter(|p| p.enabled)
        .map(|p| p.name.as_str())
        .collect();
    info!(total_bill, days = scenario.billing.days, ?enabled, "running bill analysis");

    let report = SavingsReport::compute(&engine, total_bill, &scenario.appliances, scenario.billing.days)?;
    Ok(report)
}
