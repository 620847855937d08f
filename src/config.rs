//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::appliances::{ApplianceProfile, default_household};
use crate::error::ConfigError;
use crate::tariff::charges::{FixedCharge, TaxPolicy};
use crate::tariff::engine::TariffEngine;
use crate::tariff::schedule::{TariffSchedule, check_slabs};
use crate::tariff::types::Slab;
use crate::tariff::usage::DEFAULT_BILLING_DAYS;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the `standard` preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::standard`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Bill amount and period length.
    #[serde(default)]
    pub billing: BillingConfig,
    /// Slab schedule.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Sanctioned-load fixed charge.
    #[serde(default)]
    pub fixed_charge: FixedChargeConfig,
    /// Tax on energy charges.
    #[serde(default)]
    pub tax: TaxConfig,
    /// Household appliances and their smart-mode settings.
    #[serde(default = "default_household")]
    pub appliances: Vec<ApplianceProfile>,
}

/// Bill amount and billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BillingConfig {
    /// Gross bill to invert. May be supplied on the command line instead.
    pub total_bill: Option<f64>,
    /// Billing period length (days, > 0).
    pub days: usize,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            total_bill: None,
            days: DEFAULT_BILLING_DAYS,
        }
    }
}

/// Slab schedule section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Slabs in ascending order; the last one omits `limit`.
    pub slabs: Vec<Slab>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            slabs: vec![
                Slab::bounded(50.0, 4.5),
                Slab::bounded(100.0, 5.9),
                Slab::bounded(300.0, 6.25),
                Slab::bounded(500.0, 7.0),
                Slab::unbounded(8.5),
            ],
        }
    }
}

/// Fixed charge section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixedChargeConfig {
    /// Sanctioned load (kW).
    pub sanctioned_load_kw: f64,
    /// Charge per sanctioned kW.
    pub load_rate: f64,
}

impl Default for FixedChargeConfig {
    fn default() -> Self {
        Self {
            sanctioned_load_kw: 5.0,
            load_rate: 120.0,
        }
    }
}

/// Tax section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxConfig {
    /// Percentage applied to energy charges.
    pub percent: f64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self { percent: 5.0 }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScenarioConfig {
    /// Five-slab tariff with a 5 kW × 120 fixed charge and 5 % tax.
    pub fn standard() -> Self {
        Self {
            billing: BillingConfig::default(),
            tariff: TariffConfig::default(),
            fixed_charge: FixedChargeConfig::default(),
            tax: TaxConfig::default(),
            appliances: default_household(),
        }
    }

    /// Four-slab tariff with a flat fixed charge of 50 and no tax.
    pub fn smartthings() -> Self {
        Self {
            billing: BillingConfig::default(),
            tariff: TariffConfig {
                slabs: vec![
                    Slab::bounded(100.0, 3.0),
                    Slab::bounded(300.0, 4.5),
                    Slab::bounded(500.0, 6.0),
                    Slab::unbounded(7.5),
                ],
            },
            fixed_charge: FixedChargeConfig {
                sanctioned_load_kw: 1.0,
                load_rate: 50.0,
            },
            tax: TaxConfig { percent: 0.0 },
            appliances: default_household(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["standard", "smartthings"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "standard" => Ok(Self::standard()),
            "smartthings" => Ok(Self::smartthings()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Turns on smart mode for the appliance called `name`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if no appliance has that name.
    pub fn enable_appliance(&mut self, name: &str) -> Result<(), ConfigError> {
        let Some(profile) = self.appliances.iter_mut().find(|p| p.name == name) else {
            let known: Vec<&str> = self.appliances.iter().map(|p| p.name.as_str()).collect();
            return Err(ConfigError::new(
                "appliances",
                format!("unknown appliance \"{name}\", available: {}", known.join(", ")),
            ));
        };
        profile.enabled = true;
        Ok(())
    }

    /// Builds the engine described by the tariff, fixed charge and tax sections.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` among those sections.
    pub fn to_engine(&self) -> Result<TariffEngine, ConfigError> {
        check_slabs(&self.tariff.slabs)
            .map_err(|v| ConfigError::new(v.field_path("tariff.slabs"), v.reason))?;
        let schedule = TariffSchedule::new(self.tariff.slabs.clone())
            .map_err(|e| ConfigError::new("tariff.slabs", e.reason))?;
        let fixed = FixedCharge::new(
            self.fixed_charge.sanctioned_load_kw,
            self.fixed_charge.load_rate,
        )
        .map_err(|e| ConfigError::new("fixed_charge", e.reason))?;
        let tax = TaxPolicy::new(self.tax.percent).map_err(|e| ConfigError::new("tax.percent", e.reason))?;
        Ok(TariffEngine::new(schedule, fixed, tax))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let b = &self.billing;
        if b.days == 0 {
            errors.push(ConfigError::new("billing.days", "must be > 0"));
        }
        if let Some(bill) = b.total_bill {
            if !bill.is_finite() || bill <= 0.0 {
                errors.push(ConfigError::new("billing.total_bill", "must be > 0"));
            } else {
                let fixed = self.fixed_charge.sanctioned_load_kw * self.fixed_charge.load_rate;
                if bill <= fixed {
                    errors.push(ConfigError::new(
                        "billing.total_bill",
                        format!("must exceed the fixed charge ({fixed})"),
                    ));
                }
            }
        }

        if let Err(v) = check_slabs(&self.tariff.slabs) {
            errors.push(ConfigError::new(v.field_path("tariff.slabs"), v.reason));
        }

        let fc = &self.fixed_charge;
        if !fc.sanctioned_load_kw.is_finite() || fc.sanctioned_load_kw < 0.0 {
            errors.push(ConfigError::new("fixed_charge.sanctioned_load_kw", "must be >= 0"));
        }
        if !fc.load_rate.is_finite() || fc.load_rate < 0.0 {
            errors.push(ConfigError::new("fixed_charge.load_rate", "must be >= 0"));
        }

        if !self.tax.percent.is_finite() || self.tax.percent < 0.0 {
            errors.push(ConfigError::new("tax.percent", "must be >= 0"));
        }

        for (i, profile) in self.appliances.iter().enumerate() {
            if let Err(e) = profile.validate() {
                errors.push(ConfigError::new(format!("appliances[{i}]"), e.reason));
            }
            if self.appliances[..i].iter().any(|p| p.name == profile.name) {
                errors.push(ConfigError::new(
                    format!("appliances[{i}].name"),
                    format!("duplicate appliance name \"{}\"", profile.name),
                ));
            }
        }

        errors
    }
}
