//! Smart-appliance profiles and the consumption reduction they produce.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{InvalidInputError, ensure_non_negative};

/// A household appliance with an optional smart (energy-saving) mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceProfile {
    /// Identifier used on the command line and in reports.
    pub name: String,
    /// Consumption over the billing period without smart mode (kWh).
    pub baseline_kwh: f64,
    /// Fraction of `baseline_kwh` saved in smart mode (0.0 to 1.0).
    pub savings_rate: f64,
    /// Whether smart mode is switched on.
    #[serde(default)]
    pub enabled: bool,
}

impl ApplianceProfile {
    pub fn new(name: impl Into<String>, baseline_kwh: f64, savings_rate: f64, enabled: bool) -> Self {
        Self {
            name: name.into(),
            baseline_kwh,
            savings_rate,
            enabled,
        }
    }

    /// Checks baseline and savings fraction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` for a negative baseline or a savings rate
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        ensure_non_negative(self.baseline_kwh, &format!("{} baseline kWh", self.name))?;
        if !(0.0..=1.0).contains(&self.savings_rate) {
            return Err(InvalidInputError::new(format!(
                "{} savings rate must be in [0, 1], got {}",
                self.name, self.savings_rate
            )));
        }
        Ok(())
    }

    /// kWh saved by this appliance, zero when smart mode is off.
    pub fn savings_kwh(&self) -> f64 {
        if self.enabled {
            self.baseline_kwh * self.savings_rate
        } else {
            0.0
        }
    }
}

/// The household used by the bundled presets: fridge, AC and washing
/// machine, all with smart mode off.
pub fn default_household() -> Vec<ApplianceProfile> {
    vec![
        ApplianceProfile::new("fridge", 90.0, 0.20, false),
        ApplianceProfile::new("ac", 300.0, 0.15, false),
        ApplianceProfile::new("washing_machine", 30.0, 0.18, false),
    ]
}

/// Subtracts the savings of every enabled appliance from `consumption_kwh`.
///
/// Savings add up across appliances and come off the aggregate consumption.
/// The result never goes below zero; when it would, it is clamped and a
/// warning is logged.
///
/// # Errors
///
/// Returns `InvalidInputError` if `consumption_kwh` is negative or any
/// profile is invalid.
pub fn apply_appliance_savings(
    consumption_kwh: f64,
    profiles: &[ApplianceProfile],
) -> Result<f64, InvalidInputError> {
    ensure_non_negative(consumption_kwh, "consumption")?;
    for profile in profiles {
        profile.validate()?;
    }

    let savings: f64 = profiles.iter().map(ApplianceProfile::savings_kwh).sum();
    let smart = consumption_kwh - savings;
    if smart < 0.0 {
        warn!(
            consumption_kwh,
            savings_kwh = savings,
            "appliance savings exceed consumption, clamping to zero"
        );
        return Ok(0.0);
    }
    Ok(smart)
}
