//! Property tests for the slab engine.

mod common;

use common::{standard_engine, standard_schedule};
use proptest::prelude::*;
use tariff_sim::appliances::{ApplianceProfile, apply_appliance_savings};
use tariff_sim::tariff::charges::{FixedCharge, TaxPolicy};
use tariff_sim::tariff::engine::TariffEngine;
use tariff_sim::tariff::schedule::TariffSchedule;
use tariff_sim::tariff::types::Slab;
use tariff_sim::tariff::usage::DailyUsageSeries;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

fn profile_strategy() -> impl Strategy<Value = ApplianceProfile> {
    (0.0..500.0f64, 0.0..=1.0f64, any::<bool>())
        .prop_map(|(baseline, rate, enabled)| ApplianceProfile::new("device", baseline, rate, enabled))
}

proptest! {
    #[test]
    fn projection_round_trips_inversion(bill in 600.5..50_000.0f64) {
        let engine = standard_engine();
        let r = engine.invert_bill_to_consumption(bill).unwrap();
        let p = engine.project_consumption_to_cost(r.consumption_kwh).unwrap();
        prop_assert!(close(p.total_cost, r.energy_charges_before_tax),
            "projected {} vs inverted {}", p.total_cost, r.energy_charges_before_tax);
    }

    #[test]
    fn bill_components_sum_to_total(bill in 600.5..50_000.0f64) {
        let r = standard_engine().invert_bill_to_consumption(bill).unwrap();
        prop_assert!(close(r.fixed_charge + r.energy_charges_before_tax + r.tax_amount, bill));
        // 5 % tax on the pre-tax energy charge
        prop_assert!(close(r.tax_amount, r.energy_charges_before_tax * 0.05));
    }

    #[test]
    fn breakdown_conserves_energy_and_cost(kwh in 0.0..5_000.0f64) {
        let p = standard_schedule().project_consumption_to_cost(kwh).unwrap();
        let kwh_sum: f64 = p.slab_breakdown.iter().map(|u| u.kwh).sum();
        let cost_sum: f64 = p.slab_breakdown.iter().map(|u| u.cost).sum();
        prop_assert!(close(kwh_sum, kwh));
        prop_assert!(close(cost_sum, p.total_cost));
        prop_assert!(p.slab_breakdown.iter().all(|u| u.kwh > 0.0));
    }

    #[test]
    fn higher_bill_means_more_consumption(a in 600.5..20_000.0f64, delta in 0.01..5_000.0f64) {
        let engine = standard_engine();
        let low = engine.invert_bill_to_consumption(a).unwrap();
        let high = engine.invert_bill_to_consumption(a + delta).unwrap();
        prop_assert!(high.consumption_kwh > low.consumption_kwh);
    }

    #[test]
    fn slab_number_is_monotonic(a in 0.0..2_000.0f64, b in 0.0..2_000.0f64) {
        let schedule = standard_schedule();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let s_lo = schedule.slab_number_for_cumulative_usage(lo).unwrap();
        let s_hi = schedule.slab_number_for_cumulative_usage(hi).unwrap();
        prop_assert!(s_lo <= s_hi);
        prop_assert!((1..=schedule.len()).contains(&s_hi));
    }

    #[test]
    fn smart_consumption_never_exceeds_regular(
        kwh in 0.0..2_000.0f64,
        profiles in proptest::collection::vec(profile_strategy(), 0..5),
    ) {
        let smart = apply_appliance_savings(kwh, &profiles).unwrap();
        prop_assert!(smart <= kwh);
        prop_assert!(smart >= 0.0);
    }

    #[test]
    fn savings_are_non_negative(
        bill in 600.5..20_000.0f64,
        profiles in proptest::collection::vec(profile_strategy(), 0..5),
    ) {
        let r = standard_engine().compute_savings_report(bill, &profiles).unwrap();
        let s = r.smart.unwrap();
        prop_assert!(s.smart_consumption_kwh <= r.consumption_kwh);
        prop_assert!(s.cost_savings >= -1e-9);
        prop_assert!(close(s.total_savings, s.cost_savings + s.tax_savings));
    }

    #[test]
    fn daily_series_ends_at_total(kwh in 0.0..5_000.0f64, days in 1usize..=62) {
        let series: Vec<_> = DailyUsageSeries::new(kwh, days).unwrap().collect();
        prop_assert_eq!(series.len(), days);
        prop_assert!(close(series[days - 1].cumulative_kwh, kwh));
        prop_assert!(series.windows(2).all(|w| w[0].cumulative_kwh <= w[1].cumulative_kwh));
    }
}

fn rate_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![1 => Just(0.0), 4 => 0.5..12.0f64]
}

/// Ascending bounded slabs (zero rates allowed) closed by an unbounded slab
/// with a positive rate.
fn schedule_strategy() -> impl Strategy<Value = TariffSchedule> {
    (
        proptest::collection::vec((1.0..250.0f64, rate_strategy()), 0..6),
        0.5..12.0f64,
    )
        .prop_map(|(bands, last_rate)| {
            let mut limit = 0.0;
            let mut slabs: Vec<Slab> = bands
                .into_iter()
                .map(|(width, rate)| {
                    limit += width;
                    Slab::bounded(limit, rate)
                })
                .collect();
            slabs.push(Slab::unbounded(last_rate));
            TariffSchedule::new(slabs).expect("generated schedule is valid")
        })
}

proptest! {
    #[test]
    fn any_schedule_conserves_projected_energy(
        schedule in schedule_strategy(),
        kwh in 0.0..3_000.0f64,
    ) {
        let p = schedule.project_consumption_to_cost(kwh).unwrap();
        let kwh_sum: f64 = p.slab_breakdown.iter().map(|u| u.kwh).sum();
        prop_assert!(close(kwh_sum, kwh), "sum {} vs {}", kwh_sum, kwh);
        let cost_sum: f64 = p.slab_breakdown.iter().map(|u| u.cost).sum();
        prop_assert!(close(cost_sum, p.total_cost));
    }

    #[test]
    fn any_schedule_inversion_matches_projection_per_slab(
        schedule in schedule_strategy(),
        fixed in 0.0..500.0f64,
        tax_percent in 0.0..30.0f64,
        gross in 0.01..20_000.0f64,
    ) {
        let engine = TariffEngine::new(
            schedule,
            FixedCharge::flat(fixed).unwrap(),
            TaxPolicy::new(tax_percent).unwrap(),
        );
        let r = engine.invert_bill_to_consumption(fixed + gross).unwrap();
        let p = engine.project_consumption_to_cost(r.consumption_kwh).unwrap();

        let tol = 1e-6 * r.consumption_kwh.max(1.0);
        for usage in &r.slab_breakdown {
            let projected = p.kwh_in_slab(usage.slab);
            prop_assert!(
                (projected - usage.kwh).abs() <= tol,
                "slab {}: inverted {} vs projected {}", usage.slab, usage.kwh, projected
            );
        }
        prop_assert!(close(p.total_cost, r.energy_charges_before_tax),
            "projected {} vs inverted {}", p.total_cost, r.energy_charges_before_tax);
    }

    #[test]
    fn any_schedule_slab_number_is_monotonic(
        schedule in schedule_strategy(),
        a in 0.0..2_000.0f64,
        b in 0.0..2_000.0f64,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let s_lo = schedule.slab_number_for_cumulative_usage(lo).unwrap();
        let s_hi = schedule.slab_number_for_cumulative_usage(hi).unwrap();
        prop_assert!(s_lo <= s_hi);
        prop_assert!((1..=schedule.len()).contains(&s_hi));
    }

    #[test]
    fn zero_rate_final_slab_is_always_rejected(
        limits in proptest::collection::vec(1.0..250.0f64, 0..5),
    ) {
        let mut limit = 0.0;
        let mut slabs: Vec<Slab> = limits
            .into_iter()
            .map(|width| {
                limit += width;
                Slab::bounded(limit, 3.0)
            })
            .collect();
        slabs.push(Slab::unbounded(0.0));
        prop_assert!(TariffSchedule::new(slabs).is_err());
    }
}
