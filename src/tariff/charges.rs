//! Fixed charge and tax models.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, ensure_non_negative};

/// Flat per-period charge proportional to the sanctioned load.
///
/// Only constructible through [`FixedCharge::new`]; deserialization runs the
/// same checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFixedCharge")]
pub struct FixedCharge {
    sanctioned_load_kw: f64,
    load_rate: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFixedCharge {
    sanctioned_load_kw: f64,
    load_rate: f64,
}

impl TryFrom<RawFixedCharge> for FixedCharge {
    type Error = InvalidInputError;

    fn try_from(raw: RawFixedCharge) -> Result<Self, Self::Error> {
        Self::new(raw.sanctioned_load_kw, raw.load_rate)
    }
}

impl FixedCharge {
    /// Creates a fixed charge of `sanctioned_load_kw × load_rate`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if either factor is negative or not finite.
    pub fn new(sanctioned_load_kw: f64, load_rate: f64) -> Result<Self, InvalidInputError> {
        ensure_non_negative(sanctioned_load_kw, "sanctioned load")?;
        ensure_non_negative(load_rate, "load rate")?;
        Ok(Self {
            sanctioned_load_kw,
            load_rate,
        })
    }

    /// A flat charge independent of load, modelled as 1 kW at `amount`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if `amount` is negative or not finite.
    pub fn flat(amount: f64) -> Result<Self, InvalidInputError> {
        Self::new(1.0, amount)
    }

    /// Sanctioned (contracted) load (kW).
    pub fn sanctioned_load_kw(&self) -> f64 {
        self.sanctioned_load_kw
    }

    /// Charge per sanctioned kW per period.
    pub fn load_rate(&self) -> f64 {
        self.load_rate
    }

    /// The charge for one billing period.
    pub fn amount(&self) -> f64 {
        self.sanctioned_load_kw * self.load_rate
    }
}

/// A single percentage tax levied on energy charges only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTaxPolicy")]
pub struct TaxPolicy {
    percent: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTaxPolicy {
    percent: f64,
}

impl TryFrom<RawTaxPolicy> for TaxPolicy {
    type Error = InvalidInputError;

    fn try_from(raw: RawTaxPolicy) -> Result<Self, Self::Error> {
        Self::new(raw.percent)
    }
}

impl TaxPolicy {
    /// # Errors
    ///
    /// Returns `InvalidInputError` if `percent` is negative or not finite.
    pub fn new(percent: f64) -> Result<Self, InvalidInputError> {
        ensure_non_negative(percent, "tax percent")?;
        Ok(Self { percent })
    }

    /// No tax.
    pub fn none() -> Self {
        Self { percent: 0.0 }
    }

    /// Tax rate in percent (5.0 means 5 %).
    pub fn percent(&self) -> f64 {
        self.percent
    }

    fn multiplier(&self) -> f64 {
        1.0 + self.percent / 100.0
    }

    /// Splits a tax-inclusive amount into `(net, tax)` with `net + tax == gross`.
    pub fn split_gross(&self, gross: f64) -> (f64, f64) {
        let net = gross / self.multiplier();
        (net, gross - net)
    }

    /// Tax due on a net energy charge.
    pub fn tax_on(&self, net: f64) -> f64 {
        net * self.percent / 100.0
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::none()
    }
}
