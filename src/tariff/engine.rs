//! Bill inversion and savings computation over a slab tariff.

use serde::Serialize;
use tracing::debug;

use super::charges::{FixedCharge, TaxPolicy};
use super::schedule::TariffSchedule;
use super::types::{BillingResult, CostProjection, SlabUsage, SmartSavings};
use crate::appliances::{ApplianceProfile, apply_appliance_savings};
use crate::error::InvalidInputError;

/// Tariff calculator bound to one schedule, fixed charge and tax policy.
///
/// Holds no mutable state; every method is a pure function of its inputs
/// and the engine can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffEngine {
    schedule: TariffSchedule,
    fixed_charge: FixedCharge,
    tax: TaxPolicy,
}

impl TariffEngine {
    pub fn new(schedule: TariffSchedule, fixed_charge: FixedCharge, tax: TaxPolicy) -> Self {
        Self {
            schedule,
            fixed_charge,
            tax,
        }
    }

    pub fn schedule(&self) -> &TariffSchedule {
        &self.schedule
    }

    pub fn fixed_charge(&self) -> FixedCharge {
        self.fixed_charge
    }

    pub fn tax(&self) -> TaxPolicy {
        self.tax
    }

    /// Recovers consumption from a tax- and fixed-charge-inclusive bill.
    ///
    /// The fixed charge is removed, tax is divided out of the remainder, and
    /// the resulting energy charge is spent slab by slab: each slab takes at
    /// most the cost of its full width, and the final slab absorbs whatever is
    /// left. A bounded slab with a zero rate is free capacity and is consumed
    /// in full whenever charge remains after the slabs below it.
    ///
    /// The returned `smart` field is `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if the bill is not a finite positive
    /// number or does not exceed the fixed charge.
    pub fn invert_bill_to_consumption(
        &self,
        total_bill: f64,
    ) -> Result<BillingResult, InvalidInputError> {
        if !total_bill.is_finite() || total_bill <= 0.0 {
            return Err(InvalidInputError::new(format!(
                "bill must be a positive amount, got {total_bill}"
            )));
        }
        let fixed_charge = self.fixed_charge.amount();
        if total_bill <= fixed_charge {
            return Err(InvalidInputError::new(format!(
                "bill must exceed fixed charge ({total_bill} <= {fixed_charge})"
            )));
        }

        let (energy_charges_before_tax, tax_amount) = self.tax.split_gross(total_bill - fixed_charge);

        let mut remaining = energy_charges_before_tax;
        let mut consumption_kwh = 0.0;
        let mut slab_breakdown = Vec::new();

        for band in self.schedule.bands() {
            if remaining <= 0.0 {
                break;
            }
            let (kwh, cost) = if band.rate == 0.0 {
                (band.width(), 0.0)
            } else {
                let cost = (band.width() * band.rate).min(remaining);
                (cost / band.rate, cost)
            };
            slab_breakdown.push(SlabUsage {
                slab: band.slab,
                kwh,
                cost,
                rate: band.rate,
            });
            consumption_kwh += kwh;
            remaining -= cost;
        }

        debug!(
            total_bill,
            fixed_charge,
            energy_charges_before_tax,
            tax_amount,
            consumption_kwh,
            "inverted bill"
        );

        Ok(BillingResult {
            consumption_kwh,
            slab_breakdown,
            fixed_charge,
            energy_charges_before_tax,
            tax_amount,
            total_bill: fixed_charge + energy_charges_before_tax + tax_amount,
            smart: None,
        })
    }

    /// Forward slab fill; see [`TariffSchedule::project_consumption_to_cost`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` for negative or non-finite consumption.
    pub fn project_consumption_to_cost(
        &self,
        consumption_kwh: f64,
    ) -> Result<CostProjection, InvalidInputError> {
        self.schedule.project_consumption_to_cost(consumption_kwh)
    }

    /// Inverts the bill, applies appliance savings, and prices both
    /// consumption figures.
    ///
    /// Tax savings are proportional to the energy-charge reduction, which
    /// equals recomputing tax on the smart energy charge under a single
    /// tax rate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` for any invalid bill or appliance profile.
    pub fn compute_savings_report(
        &self,
        total_bill: f64,
        profiles: &[ApplianceProfile],
    ) -> Result<BillingResult, InvalidInputError> {
        for profile in profiles {
            profile.validate()?;
        }

        let mut result = self.invert_bill_to_consumption(total_bill)?;
        let smart_consumption_kwh = apply_appliance_savings(result.consumption_kwh, profiles)?;

        let regular = self.schedule.project_consumption_to_cost(result.consumption_kwh)?;
        let smart = self.schedule.project_consumption_to_cost(smart_consumption_kwh)?;

        let cost_savings = regular.total_cost - smart.total_cost;
        let tax_savings = self.tax.tax_on(cost_savings);

        debug!(
            consumption_kwh = result.consumption_kwh,
            smart_consumption_kwh,
            cost_savings,
            tax_savings,
            "computed smart-mode savings"
        );

        result.smart = Some(SmartSavings {
            smart_consumption_kwh,
            smart_slab_breakdown: smart.slab_breakdown,
            kwh_savings: result.consumption_kwh - smart_consumption_kwh,
            cost_savings,
            tax_savings,
            total_savings: cost_savings + tax_savings,
        });
        Ok(result)
    }
}
