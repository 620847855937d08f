//! Progressive (slab) tariff billing and smart-appliance savings engine.

pub mod appliances;
pub mod config;
pub mod error;
pub mod io;
pub mod report;
pub mod runner;
/// Slab schedules, charges, bill inversion, and usage trends.
pub mod tariff;

/// REST API over the engine.
#[cfg(feature = "api")]
pub mod api;
