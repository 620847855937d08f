//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use tariff_sim::appliances::ApplianceProfile;
use tariff_sim::tariff::charges::{FixedCharge, TaxPolicy};
use tariff_sim::tariff::engine::TariffEngine;
use tariff_sim::tariff::schedule::TariffSchedule;
use tariff_sim::tariff::types::Slab;

/// Relative tolerance for floating-point comparisons.
pub const REL_TOL: f64 = 1e-9;

/// Asserts `actual` is within `REL_TOL` of `expected` (absolute near zero).
pub fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= REL_TOL * scale,
        "expected {expected}, got {actual}"
    );
}

/// Five-slab schedule: 50@4.5, 100@5.9, 300@6.25, 500@7.0, ∞@8.5.
pub fn standard_schedule() -> TariffSchedule {
    TariffSchedule::new(vec![
        Slab::bounded(50.0, 4.5),
        Slab::bounded(100.0, 5.9),
        Slab::bounded(300.0, 6.25),
        Slab::bounded(500.0, 7.0),
        Slab::unbounded(8.5),
    ])
    .expect("standard schedule is valid")
}

/// Standard engine: 5 kW × 120 fixed charge, 5 % tax.
pub fn standard_engine() -> TariffEngine {
    TariffEngine::new(
        standard_schedule(),
        FixedCharge::new(5.0, 120.0).expect("fixed charge is valid"),
        TaxPolicy::new(5.0).expect("tax is valid"),
    )
}

/// Fridge, AC and washing machine with only the AC in smart mode.
pub fn ac_only_household() -> Vec<ApplianceProfile> {
    vec![
        ApplianceProfile::new("fridge", 90.0, 0.20, false),
        ApplianceProfile::new("ac", 300.0, 0.15, true),
        ApplianceProfile::new("washing_machine", 30.0, 0.18, false),
    ]
}
