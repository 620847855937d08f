/// Fixed charge and tax models.
pub mod charges;
pub mod engine;
pub mod schedule;
pub mod types;
/// Daily usage series and slab-transition trends.
pub mod usage;
