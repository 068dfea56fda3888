pub mod catalog;
pub mod compute;
pub mod registry;

use contracts::shared::metrics::{
    ComputeMetricsRequest, ComputeMetricsResponse, Dimension, MetricId, MetricTable,
};

use crate::error::EngineError;
use crate::filter;
use crate::normalize::Dataset;
use registry::MetricRegistry;

/// Facade over the registry: applies the filter criteria, then computes
/// each requested metric table. One synchronous pass per render, no state
/// kept between invocations.
pub struct MetricsEngine {
    registry: &'static MetricRegistry,
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self {
            registry: MetricRegistry::global(),
        }
    }

    /// Compute a batch of metrics over one filtered cut of the dataset.
    ///
    /// Unknown metric ids are logged and skipped so one bad request entry
    /// cannot blank the rest of a dashboard.
    pub fn compute(&self, dataset: &Dataset, request: &ComputeMetricsRequest) -> ComputeMetricsResponse {
        let filtered = filter::apply(&request.criteria, dataset);

        let mut tables = Vec::with_capacity(request.metric_ids.len());
        for id in &request.metric_ids {
            let Some(def) = self.registry.get(id) else {
                tracing::warn!("metric {} not found in registry", id.0);
                continue;
            };
            let dims = request
                .grouping
                .clone()
                .unwrap_or_else(|| def.default_grouping.clone());
            tables.push(compute::compute_table(&filtered, def, &dims));
        }

        ComputeMetricsResponse { tables }
    }

    /// Compute a single metric over an already-filtered dataset.
    pub fn compute_one(
        &self,
        dataset: &Dataset,
        id: &MetricId,
        dims: &[Dimension],
    ) -> Result<MetricTable, EngineError> {
        let def = self
            .registry
            .get(id)
            .ok_or_else(|| EngineError::UnknownMetric(id.0.clone()))?;
        Ok(compute::compute_table(dataset, def, dims))
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::call_record::{CallRecord, CallType, Market};
    use contracts::shared::filters::FilterCriteria;
    use contracts::shared::metrics::MetricAvailability;

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        for (lead, pipeline, call_type) in [
            ("A", "CZ Main", CallType::IntroCall),
            ("A", "CZ Main", CallType::SalesCall),
            ("B", "SK Online", CallType::IntroCall),
            ("B", "SK Online", CallType::IntroFollowup),
        ] {
            records.push(CallRecord {
                call_id: format!("{lead}-{}", records.len()),
                lead_id: Some(lead.into()),
                call_datetime: None,
                call_date: None,
                pipeline_name: Some(pipeline.into()),
                market: Market::from_pipeline(pipeline),
                manager: Some("Eva".into()),
                call_type: Some(call_type),
                call_duration_sec: 60.0,
                average_quality: None,
                next_step_type: None,
                main_objection_type: None,
            });
        }
        Dataset {
            records,
            coverage: crate::normalize::ColumnCoverage {
                lead_id: true,
                call_duration_sec: true,
                average_quality: false,
                main_objection_type: false,
            },
        }
    }

    #[test]
    fn test_batch_applies_filter_and_skips_unknown_ids() {
        let engine = MetricsEngine::new();
        let request = ComputeMetricsRequest {
            metric_ids: vec![catalog::ids::intro_friction(), MetricId::new("bogus")],
            grouping: None,
            criteria: FilterCriteria::default().with_market("SK"),
        };

        let response = engine.compute(&dataset(), &request);
        assert_eq!(response.tables.len(), 1);
        let table = &response.tables[0];
        // Only the SK records remain: 1 follow-up over 1 intro call.
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].group, vec!["SK".to_string()]);
        assert_eq!(table.rows[0].cell.value, Some(1.0));
    }

    #[test]
    fn test_filter_to_nothing_is_no_data_not_error() {
        let engine = MetricsEngine::new();
        let request = ComputeMetricsRequest {
            metric_ids: vec![catalog::ids::vague_rate()],
            grouping: None,
            criteria: FilterCriteria::default().with_market("RUK"),
        };
        let response = engine.compute(&dataset(), &request);
        assert_eq!(response.tables[0].availability, MetricAvailability::NoData);
    }

    #[test]
    fn test_compute_one_unknown_metric_errors() {
        let engine = MetricsEngine::new();
        let err = engine
            .compute_one(&dataset(), &MetricId::new("bogus"), &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownMetric(_)));
    }
}
