use thiserror::Error;

/// Typed errors the engine can return to a caller.
///
/// Dataset conditions are deliberately not here: an empty fetch yields
/// `NoData` tables, a missing column yields `Unavailable` tables, and
/// malformed row values are coerced by the normalizer. Only a genuinely
/// wrong request fails.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown metric id: {0}")]
    UnknownMetric(String),
}
