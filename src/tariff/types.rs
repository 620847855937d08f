//! Core tariff types: slabs, per-slab usage, and calculation results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One tier of a progressive tariff.
///
/// `limit` is the exclusive cumulative upper bound in kWh; `None` marks the
/// final, unbounded slab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slab {
    /// Cumulative upper bound (kWh), or `None` for the unbounded final slab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    /// Price per kWh inside this slab.
    pub rate: f64,
}

impl Slab {
    /// A bounded slab ending at `limit` kWh.
    pub fn bounded(limit: f64, rate: f64) -> Self {
        Self {
            limit: Some(limit),
            rate,
        }
    }

    /// The final, unbounded slab.
    pub fn unbounded(rate: f64) -> Self {
        Self { limit: None, rate }
    }

    /// Upper bound as a float, `f64::INFINITY` when unbounded.
    pub fn upper_bound(&self) -> f64 {
        self.limit.unwrap_or(f64::INFINITY)
    }
}

/// Energy and cost attributed to one slab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlabUsage {
    /// 1-based slab index.
    pub slab: usize,
    /// Energy billed in this slab (kWh).
    pub kwh: f64,
    /// Cost of that energy before tax.
    pub cost: f64,
    /// Rate applied (currency per kWh).
    pub rate: f64,
}

/// Result of distributing a consumption figure across a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostProjection {
    /// Slabs that received energy, in ascending slab order.
    pub slab_breakdown: Vec<SlabUsage>,
    /// Sum of per-slab kWh.
    pub total_kwh: f64,
    /// Sum of per-slab cost (energy charges before tax).
    pub total_cost: f64,
}

impl CostProjection {
    /// Energy billed in the given 1-based slab, `0.0` if the slab was not reached.
    pub fn kwh_in_slab(&self, slab: usize) -> f64 {
        self.slab_breakdown
            .iter()
            .find(|u| u.slab == slab)
            .map_or(0.0, |u| u.kwh)
    }
}

/// Smart-mode figures, present when a savings report was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartSavings {
    /// Consumption after enabled appliance savings (kWh, >= 0).
    pub smart_consumption_kwh: f64,
    /// Slab breakdown of the smart consumption.
    pub smart_slab_breakdown: Vec<SlabUsage>,
    /// Energy saved: `consumption_kwh - smart_consumption_kwh`.
    pub kwh_savings: f64,
    /// Energy-charge reduction before tax.
    pub cost_savings: f64,
    /// Tax avoided on the energy-charge reduction.
    pub tax_savings: f64,
    /// `cost_savings + tax_savings`.
    pub total_savings: f64,
}

/// Full breakdown of a bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingResult {
    /// Consumption recovered from the bill (kWh).
    pub consumption_kwh: f64,
    /// Per-slab allocation of that consumption.
    pub slab_breakdown: Vec<SlabUsage>,
    /// Fixed charge for the period.
    pub fixed_charge: f64,
    /// Energy charges with tax removed.
    pub energy_charges_before_tax: f64,
    /// Tax levied on the energy charges.
    pub tax_amount: f64,
    /// `fixed_charge + energy_charges_before_tax + tax_amount`.
    pub total_bill: f64,
    /// Smart-mode comparison, set by
    /// [`TariffEngine::compute_savings_report`](super::engine::TariffEngine::compute_savings_report).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart: Option<SmartSavings>,
}

impl BillingResult {
    /// Bill amount excluding the fixed charge.
    pub fn bill_without_fixed(&self) -> f64 {
        self.total_bill - self.fixed_charge
    }
}

impl fmt::Display for SlabUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slab {:>2} | {:>9.2} kWh @ {:>6.2} = {:>10.2}",
            self.slab, self.kwh, self.rate, self.cost
        )
    }
}
