//! API request, response and query types.

use serde::{Deserialize, Serialize};

use crate::appliances::ApplianceProfile;
use crate::config::ScenarioConfig;
use crate::error::ConfigError;
use crate::report::SavingsReport;
use crate::tariff::types::Slab;

/// Loaded scenario plus its report.
#[derive(Debug, Serialize)]
pub struct StateResponse<'a> {
    pub scenario: &'a ScenarioConfig,
    /// `null` when the scenario has no bill amount.
    pub report: Option<&'a SavingsReport>,
}

/// Body of `POST /calculate`.
///
/// Every field except `total_bill` is optional and falls back to the loaded
/// scenario.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculateRequest {
    /// Gross bill to analyse.
    pub total_bill: f64,
    /// Replacement slab schedule.
    pub slabs: Option<Vec<Slab>>,
    /// Replacement sanctioned load (kW).
    pub sanctioned_load_kw: Option<f64>,
    /// Replacement per-kW load rate.
    pub load_rate: Option<f64>,
    /// Replacement tax percentage.
    pub tax_percent: Option<f64>,
    /// Replacement appliance list.
    pub appliances: Option<Vec<ApplianceProfile>>,
    /// Names of appliances to switch to smart mode.
    #[serde(default)]
    pub enable: Vec<String>,
    /// Replacement billing period length.
    pub days: Option<usize>,
}

impl CalculateRequest {
    /// Overlays this request on `base`, returning the scenario to compute.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if an appliance in `enable` does not exist.
    pub fn apply_to(&self, base: &ScenarioConfig) -> Result<ScenarioConfig, ConfigError> {
        let mut scenario = base.clone();
        scenario.billing.total_bill = Some(self.total_bill);
        if let Some(slabs) = &self.slabs {
            scenario.tariff.slabs.clone_from(slabs);
        }
        if let Some(load) = self.sanctioned_load_kw {
            scenario.fixed_charge.sanctioned_load_kw = load;
        }
        if let Some(rate) = self.load_rate {
            scenario.fixed_charge.load_rate = rate;
        }
        if let Some(percent) = self.tax_percent {
            scenario.tax.percent = percent;
        }
        if let Some(appliances) = &self.appliances {
            scenario.appliances.clone_from(appliances);
        }
        if let Some(days) = self.days {
            scenario.billing.days = days;
        }
        for name in &self.enable {
            scenario.enable_appliance(name)?;
        }
        Ok(scenario)
    }
}

/// Optional range query parameters for the trend endpoint.
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// First day (inclusive).
    pub from: Option<usize>,
    /// Last day (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
