pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod normalize;
pub mod outcome;
pub mod source;

pub use error::EngineError;
pub use metrics::MetricsEngine;
pub use normalize::{normalize_rows, Dataset, RawRow};
