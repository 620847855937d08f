//! Day-by-day usage modelling over a billing period.
//!
//! Consumption is assumed to accrue uniformly across the period. This is a
//! modelling simplification for visualising slab transitions, not a
//! measurement of actual daily usage.

use serde::Serialize;

use super::schedule::TariffSchedule;
use crate::error::{InvalidInputError, ensure_non_negative};

/// Default billing period length in days.
pub const DEFAULT_BILLING_DAYS: usize = 30;

/// Cumulative usage at the end of one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyUsage {
    /// 1-based day of the billing period.
    pub day: usize,
    /// Usage accrued from day 1 through `day` (kWh).
    pub cumulative_kwh: f64,
}

/// Lazy iterator over [`DailyUsage`] for days `1..=days`.
///
/// Clone it to restart from the first day.
///
/// # Examples
///
/// ```
/// use tariff_sim::tariff::usage::DailyUsageSeries;
///
/// let series = DailyUsageSeries::new(300.0, 30).unwrap();
/// let days: Vec<f64> = series.map(|d| d.cumulative_kwh).collect();
/// assert_eq!(days[0], 10.0);
/// assert_eq!(days[29], 300.0);
/// ```
#[derive(Debug, Clone)]
pub struct DailyUsageSeries {
    consumption_kwh: f64,
    days: usize,
    next_day: usize,
}

impl DailyUsageSeries {
    /// # Errors
    ///
    /// Returns `InvalidInputError` if consumption is negative or `days` is zero.
    pub fn new(consumption_kwh: f64, days: usize) -> Result<Self, InvalidInputError> {
        ensure_non_negative(consumption_kwh, "consumption")?;
        if days == 0 {
            return Err(InvalidInputError::new("billing period must be at least one day"));
        }
        Ok(Self {
            consumption_kwh,
            days,
            next_day: 1,
        })
    }

    /// Series over the default 30-day period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if consumption is negative.
    pub fn monthly(consumption_kwh: f64) -> Result<Self, InvalidInputError> {
        Self::new(consumption_kwh, DEFAULT_BILLING_DAYS)
    }

    /// Cumulative usage at the end of `day`.
    pub fn cumulative_at(&self, day: usize) -> f64 {
        self.consumption_kwh * day as f64 / self.days as f64
    }
}

impl Iterator for DailyUsageSeries {
    type Item = DailyUsage;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_day > self.days {
            return None;
        }
        let day = self.next_day;
        self.next_day += 1;
        Some(DailyUsage {
            day,
            cumulative_kwh: self.cumulative_at(day),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.days + 1).saturating_sub(self.next_day);
        (left, Some(left))
    }
}

impl ExactSizeIterator for DailyUsageSeries {}

/// Regular vs. smart usage and slab position on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub day: usize,
    pub regular_kwh: f64,
    pub smart_kwh: f64,
    pub regular_slab: usize,
    pub smart_slab: usize,
}

/// First day on which each trajectory sits in a given slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlabTransition {
    /// 1-based slab index.
    pub slab: usize,
    /// First day in this slab under regular consumption, if ever reached.
    pub regular_day: Option<usize>,
    /// First day in this slab under smart consumption, if ever reached.
    pub smart_day: Option<usize>,
}

/// Builds the day-by-day comparison of regular and smart consumption.
///
/// # Errors
///
/// Returns `InvalidInputError` if either consumption is negative or `days`
/// is zero.
pub fn billing_period_trend(
    schedule: &TariffSchedule,
    regular_kwh: f64,
    smart_kwh: f64,
    days: usize,
) -> Result<Vec<TrendPoint>, InvalidInputError> {
    let regular = DailyUsageSeries::new(regular_kwh, days)?;
    let smart = DailyUsageSeries::new(smart_kwh, days)?;

    regular
        .zip(smart)
        .map(|(r, s)| {
            Ok(TrendPoint {
                day: r.day,
                regular_kwh: r.cumulative_kwh,
                smart_kwh: s.cumulative_kwh,
                regular_slab: schedule.slab_number_for_cumulative_usage(r.cumulative_kwh)?,
                smart_slab: schedule.slab_number_for_cumulative_usage(s.cumulative_kwh)?,
            })
        })
        .collect()
}

/// Finds, for every slab, the first day each trajectory enters it.
pub fn slab_transitions(trend: &[TrendPoint], slab_count: usize) -> Vec<SlabTransition> {
    (1..=slab_count)
        .map(|slab| SlabTransition {
            slab,
            regular_day: trend.iter().find(|p| p.regular_slab == slab).map(|p| p.day),
            smart_day: trend.iter().find(|p| p.smart_slab == slab).map(|p| p.day),
        })
        .collect()
}
