use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// User-selected filter state, reconstructed fresh for every render.
///
/// Each dimension is a conjunctive predicate; within a dimension,
/// membership is disjunctive. An empty set means "no restriction"
/// (include all), never "exclude all". `date_range: None` means all time,
/// including records without a parseable date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub markets: BTreeSet<String>,
    #[serde(default)]
    pub pipelines: BTreeSet<String>,
    #[serde(default)]
    pub managers: BTreeSet<String>,
}

impl FilterCriteria {
    /// No restriction on any dimension.
    pub fn all_time() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn with_market(mut self, market: &str) -> Self {
        self.markets.insert(market.to_string());
        self
    }

    pub fn with_pipeline(mut self, pipeline: &str) -> Self {
        self.pipelines.insert(pipeline.to_string());
        self
    }

    pub fn with_manager(mut self, manager: &str) -> Self {
        self.managers.insert(manager.to_string());
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.date_range.is_none()
            && self.markets.is_empty()
            && self.pipelines.is_empty()
            && self.managers.is_empty()
    }
}

/// Which dashboard view the composer is rendering. Passed by value per
/// render together with `FilterCriteria`; the core holds no ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationState {
    Ceo,
    Cmo,
    Cso,
    Lab,
}

impl Default for NavigationState {
    fn default() -> Self {
        NavigationState::Ceo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_inclusive() {
        let r = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        );
        assert!(r.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(r.contains(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
        assert!(!r.contains(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
    }

    #[test]
    fn test_default_is_unrestricted() {
        assert!(FilterCriteria::default().is_unrestricted());
        assert!(!FilterCriteria::default().with_market("CZ").is_unrestricted());
    }
}
