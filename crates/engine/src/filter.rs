use contracts::domain::call_record::CallRecord;
use contracts::shared::filters::FilterCriteria;

use crate::normalize::Dataset;

/// Build the boolean inclusion mask for a record set.
///
/// Dimensions combine with AND; membership within a dimension is OR. An
/// empty selection on a dimension restricts nothing. A missing date range
/// short-circuits to true even for records without a parseable date; a
/// literal range excludes them.
pub fn build_mask(criteria: &FilterCriteria, records: &[CallRecord]) -> Vec<bool> {
    records.iter().map(|r| matches(criteria, r)).collect()
}

pub fn matches(criteria: &FilterCriteria, record: &CallRecord) -> bool {
    if let Some(range) = &criteria.date_range {
        match record.call_date {
            Some(d) if range.contains(d) => {}
            _ => return false,
        }
    }

    if !criteria.markets.is_empty() && !criteria.markets.contains(record.market.as_str()) {
        return false;
    }

    if !criteria.pipelines.is_empty() {
        match &record.pipeline_name {
            Some(p) if criteria.pipelines.contains(p) => {}
            _ => return false,
        }
    }

    if !criteria.managers.is_empty() {
        match &record.manager {
            Some(m) if criteria.managers.contains(m) => {}
            _ => return false,
        }
    }

    true
}

/// Narrow a dataset, keeping its column coverage.
pub fn apply(criteria: &FilterCriteria, dataset: &Dataset) -> Dataset {
    let records = dataset
        .records
        .iter()
        .filter(|r| matches(criteria, r))
        .cloned()
        .collect();
    Dataset {
        records,
        coverage: dataset.coverage,
    }
}
