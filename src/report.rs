//! Complete savings report: billing breakdown plus billing-period trend.

use std::fmt;

use serde::Serialize;

use crate::appliances::ApplianceProfile;
use crate::error::InvalidInputError;
use crate::tariff::engine::TariffEngine;
use crate::tariff::types::BillingResult;
use crate::tariff::usage::{SlabTransition, TrendPoint, billing_period_trend, slab_transitions};

/// Everything a caller needs to render a bill analysis.
#[derive(Debug, Clone, Serialize)]
pub struct SavingsReport {
    /// Bill breakdown with smart-mode savings.
    pub billing: BillingResult,
    /// Billing period length (days).
    pub days: usize,
    /// Daily cumulative usage and slab position, regular vs. smart.
    pub trend: Vec<TrendPoint>,
    /// First day each trajectory enters each slab.
    pub transitions: Vec<SlabTransition>,
}

/// One row of the regular vs. smart slab table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabComparison {
    pub slab: usize,
    pub rate: f64,
    pub regular_kwh: f64,
    pub regular_cost: f64,
    pub smart_kwh: f64,
    pub smart_cost: f64,
}

impl SlabComparison {
    /// Cost avoided in this slab by smart mode.
    pub fn savings(&self) -> f64 {
        self.regular_cost - self.smart_cost
    }
}

impl SavingsReport {
    /// Runs the savings computation and derives the daily trend from it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` for an invalid bill, appliance profile, or
    /// a zero-day period.
    pub fn compute(
        engine: &TariffEngine,
        total_bill: f64,
        profiles: &[ApplianceProfile],
        days: usize,
    ) -> Result<Self, InvalidInputError> {
        if days == 0 {
            return Err(InvalidInputError::new("billing period must be at least one day"));
        }
        let billing = engine.compute_savings_report(total_bill, profiles)?;
        let smart_kwh = billing
            .smart
            .as_ref()
            .map_or(billing.consumption_kwh, |s| s.smart_consumption_kwh);
        let trend = billing_period_trend(engine.schedule(), billing.consumption_kwh, smart_kwh, days)?;
        let transitions = slab_transitions(&trend, engine.schedule().len());
        Ok(Self {
            billing,
            days,
            trend,
            transitions,
        })
    }

    /// Pairs every slab the regular consumption reaches with its smart-mode
    /// usage. Empty when no smart figures were computed.
    pub fn slab_comparison(&self) -> Vec<SlabComparison> {
        let Some(smart) = &self.billing.smart else {
            return Vec::new();
        };
        self.billing
            .slab_breakdown
            .iter()
            .map(|regular| {
                let smart_usage = smart.smart_slab_breakdown.iter().find(|u| u.slab == regular.slab);
                SlabComparison {
                    slab: regular.slab,
                    rate: regular.rate,
                    regular_kwh: regular.kwh,
                    regular_cost: regular.cost,
                    smart_kwh: smart_usage.map_or(0.0, |u| u.kwh),
                    smart_cost: smart_usage.map_or(0.0, |u| u.cost),
                }
            })
            .collect()
    }
}

impl fmt::Display for SavingsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.billing;
        writeln!(f, "--- Bill Breakdown ---")?;
        writeln!(f, "Total bill:            {:.2}", b.total_bill)?;
        writeln!(f, "Fixed charge:          {:.2}", b.fixed_charge)?;
        writeln!(f, "Bill without fixed:    {:.2}", b.bill_without_fixed())?;
        writeln!(f, "Energy charges:        {:.2}", b.energy_charges_before_tax)?;
        writeln!(f, "Tax:                   {:.2}", b.tax_amount)?;
        writeln!(f, "Consumption:           {:.2} kWh", b.consumption_kwh)?;
        for usage in &b.slab_breakdown {
            writeln!(f, "  {usage}")?;
        }

        if let Some(s) = &b.smart {
            writeln!(f)?;
            writeln!(f, "--- Smart Mode ---")?;
            writeln!(f, "Smart consumption:     {:.2} kWh", s.smart_consumption_kwh)?;
            writeln!(
                f,
                "  slab |    rate | regular kWh |    cost |   smart kWh |    cost |   savings"
            )?;
            for row in self.slab_comparison() {
                writeln!(
                    f,
                    "  {:>4} | {:>7.2} | {:>11.2} | {:>7.2} | {:>11.2} | {:>7.2} | {:>9.2}",
                    row.slab,
                    row.rate,
                    row.regular_kwh,
                    row.regular_cost,
                    row.smart_kwh,
                    row.smart_cost,
                    row.savings()
                )?;
            }
            writeln!(f, "Energy saved:          {:.2} kWh", s.kwh_savings)?;
            writeln!(f, "Cost savings:          {:.2}", s.cost_savings)?;
            writeln!(f, "Tax savings:           {:.2}", s.tax_savings)?;
            writeln!(f, "Total savings:         {:.2}", s.total_savings)?;
        }

        writeln!(f)?;
        write!(f, "--- Slab Entry Day ({} day period) ---", self.days)?;
        for t in &self.transitions {
            write!(
                f,
                "\nslab {:>2}: regular={:<6} smart={}",
                t.slab,
                day_label(t.regular_day),
                day_label(t.smart_day)
            )?;
        }
        Ok(())
    }
}

fn day_label(day: Option<usize>) -> String {
    day.map_or_else(|| "-".to_string(), |d| d.to_string())
}
