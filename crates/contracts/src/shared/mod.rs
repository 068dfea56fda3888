pub mod filters;
pub mod metrics;
