/// CSV export of the billing-period trend.
pub mod export;
