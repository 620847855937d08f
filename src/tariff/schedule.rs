//! Validated progressive tariff schedules and the forward slab fill.

use serde::Serialize;
use tracing::debug;

use super::types::{CostProjection, Slab, SlabUsage};
use crate::error::{InvalidInputError, ensure_non_negative};

/// An ordered, validated list of slabs.
///
/// Invariants, checked by [`TariffSchedule::new`]:
/// - at least one slab
/// - every bounded limit is finite, positive, and strictly above the previous one
/// - only the final slab is unbounded, and it must be
/// - every rate is finite and `>= 0`; the final slab's rate is `> 0`
///
/// # Examples
///
/// ```
/// use tariff_sim::tariff::schedule::TariffSchedule;
/// use tariff_sim::tariff::types::Slab;
///
/// let schedule = TariffSchedule::new(vec![
///     Slab::bounded(100.0, 3.0),
///     Slab::unbounded(4.5),
/// ])
/// .unwrap();
/// let projection = schedule.project_consumption_to_cost(150.0).unwrap();
/// assert_eq!(projection.total_cost, 100.0 * 3.0 + 50.0 * 4.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TariffSchedule {
    slabs: Vec<Slab>,
}

/// The first slab invariant a schedule breaks.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlabViolation {
    /// 0-based position of the offending slab, `None` for the list itself.
    pub index: Option<usize>,
    /// Offending slab field (`"limit"` or `"rate"`), if a single one.
    pub field: Option<&'static str>,
    pub reason: String,
}

impl SlabViolation {
    fn at(index: usize, field: Option<&'static str>, reason: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            field,
            reason: reason.into(),
        }
    }

    /// Dotted path below `prefix`, e.g. `tariff.slabs[2].rate`.
    pub fn field_path(&self, prefix: &str) -> String {
        match (self.index, self.field) {
            (Some(i), Some(field)) => format!("{prefix}[{i}].{field}"),
            (Some(i), None) => format!("{prefix}[{i}]"),
            (None, _) => prefix.to_string(),
        }
    }
}

/// Checks ordering, boundedness and rates of `slabs`.
pub(crate) fn check_slabs(slabs: &[Slab]) -> Result<(), SlabViolation> {
    let Some(last) = slabs.len().checked_sub(1) else {
        return Err(SlabViolation {
            index: None,
            field: None,
            reason: "tariff schedule must contain at least one slab".to_string(),
        });
    };

    let mut previous = 0.0_f64;
    for (i, slab) in slabs.iter().enumerate() {
        let n = i + 1;
        ensure_non_negative(slab.rate, &format!("slab {n} rate"))
            .map_err(|e| SlabViolation::at(i, Some("rate"), e.reason))?;
        match (slab.limit, i == last) {
            (Some(_), true) => {
                return Err(SlabViolation::at(
                    i,
                    Some("limit"),
                    format!("final slab {n} must be unbounded"),
                ));
            }
            (None, false) => {
                return Err(SlabViolation::at(
                    i,
                    Some("limit"),
                    format!("only the final slab may be unbounded, slab {n} has no limit"),
                ));
            }
            (Some(limit), false) => {
                if !limit.is_finite() || limit <= previous {
                    return Err(SlabViolation::at(
                        i,
                        Some("limit"),
                        format!("slab {n} limit {limit} must be finite and greater than {previous}"),
                    ));
                }
                previous = limit;
            }
            (None, true) => {
                if slab.rate == 0.0 {
                    return Err(SlabViolation::at(
                        i,
                        Some("rate"),
                        format!("final slab {n} must have a positive rate"),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// A slab with its resolved lower bound, as walked by the fill algorithms.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Band {
    /// 1-based slab index.
    pub slab: usize,
    pub lower: f64,
    pub upper: f64,
    pub rate: f64,
}

impl Band {
    /// Width of the band in kWh; infinite for the final slab.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl TariffSchedule {
    /// Builds a schedule, rejecting anything that breaks the slab invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` naming the first offending slab.
    pub fn new(slabs: Vec<Slab>) -> Result<Self, InvalidInputError> {
        check_slabs(&slabs).map_err(|v| InvalidInputError::new(v.reason))?;
        Ok(Self { slabs })
    }

    /// The slabs in ascending order.
    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    /// Number of slabs.
    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    /// Always `false`; a validated schedule has at least one slab.
    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }

    pub(crate) fn bands(&self) -> impl Iterator<Item = Band> + '_ {
        let mut lower = 0.0;
        self.slabs.iter().enumerate().map(move |(i, slab)| {
            let band = Band {
                slab: i + 1,
                lower,
                upper: slab.upper_bound(),
                rate: slab.rate,
            };
            lower = band.upper;
            band
        })
    }

    /// Distributes `consumption_kwh` across the slabs, filling each slab's
    /// width before moving to the next.
    ///
    /// Only slabs that receive energy appear in the breakdown, so zero
    /// consumption yields an empty breakdown and zero cost.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if `consumption_kwh` is negative or not finite.
    pub fn project_consumption_to_cost(
        &self,
        consumption_kwh: f64,
    ) -> Result<CostProjection, InvalidInputError> {
        ensure_non_negative(consumption_kwh, "consumption")?;

        let mut remaining = consumption_kwh;
        let mut slab_breakdown = Vec::new();
        let mut total_kwh = 0.0;
        let mut total_cost = 0.0;

        for band in self.bands() {
            if remaining <= 0.0 {
                break;
            }
            let kwh = remaining.min(band.width());
            let cost = kwh * band.rate;
            slab_breakdown.push(SlabUsage {
                slab: band.slab,
                kwh,
                cost,
                rate: band.rate,
            });
            total_kwh += kwh;
            total_cost += cost;
            remaining -= kwh;
        }

        debug!(
            consumption_kwh,
            total_cost,
            slabs_touched = slab_breakdown.len(),
            "projected consumption onto tariff"
        );

        Ok(CostProjection {
            slab_breakdown,
            total_kwh,
            total_cost,
        })
    }

    /// Returns the 1-based index of the first slab whose limit exceeds `kwh`,
    /// or the final slab when none does.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if `kwh` is negative or not finite.
    pub fn slab_number_for_cumulative_usage(&self, kwh: f64) -> Result<usize, InvalidInputError> {
        ensure_non_negative(kwh, "cumulative usage")?;
        Ok(self
            .slabs
            .iter()
            .position(|s| s.upper_bound() > kwh)
            .map_or(self.slabs.len(), |i| i + 1))
    }
}
