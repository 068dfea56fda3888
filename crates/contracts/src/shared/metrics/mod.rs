use serde::{Deserialize, Serialize};

use crate::shared::filters::FilterCriteria;

// ---------------------------------------------------------------------------
// Metric identity & display metadata
// ---------------------------------------------------------------------------

/// Unique metric identifier, used as key in the registry and in requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricId(pub String);

impl MetricId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// How to format the numeric value on the consumer side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueFormat {
    Number { decimals: u8 },
    Percent { decimals: u8 },
    Integer,
}

/// Static metadata describing one metric (label, format, icon, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricMeta {
    pub id: MetricId,
    pub label: String,
    pub short_label: Option<String>,
    pub icon: String,
    pub format: ValueFormat,
    pub description: Option<String>,
}

/// Full catalogue returned by the metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricCatalogResponse {
    pub metrics: Vec<MetricMeta>,
}

// ---------------------------------------------------------------------------
// Grouping dimensions
// ---------------------------------------------------------------------------

/// Calendar bucket for date grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBucket {
    Day,
    Week,
    Month,
}

/// One axis of a grouped metric table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dimension {
    Market,
    Pipeline,
    Manager,
    CallTypeGroup,
    Date { bucket: DateBucket },
}

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Market => "Market",
            Dimension::Pipeline => "Pipeline",
            Dimension::Manager => "Manager",
            Dimension::CallTypeGroup => "Call Type",
            Dimension::Date { .. } => "Date",
        }
    }
}

// ---------------------------------------------------------------------------
// Computed values
// ---------------------------------------------------------------------------

/// Distinguishes a true zero from "nothing to divide by" and from
/// "this metric cannot be computed on this dataset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricAvailability {
    /// Value computed normally.
    Computed,
    /// Denominator was 0; value is exactly 0.0 by policy, never NaN.
    ZeroDenominator,
    /// No underlying observations (e.g. mean over an empty group).
    NoData,
    /// A required column is missing from the dataset.
    Unavailable,
}

/// One computed value plus its supporting counts (shown in tooltips).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCell {
    /// `None` for `NoData` / `Unavailable`; `Some(0.0)` for `ZeroDenominator`.
    pub value: Option<f64>,
    pub availability: MetricAvailability,
    #[serde(default)]
    pub numerator: Option<f64>,
    #[serde(default)]
    pub denominator: Option<f64>,
}

impl MetricCell {
    pub fn computed(value: f64, numerator: f64, denominator: f64) -> Self {
        Self {
            value: Some(value),
            availability: MetricAvailability::Computed,
            numerator: Some(numerator),
            denominator: Some(denominator),
        }
    }

    pub fn zero_denominator(numerator: f64) -> Self {
        Self {
            value: Some(0.0),
            availability: MetricAvailability::ZeroDenominator,
            numerator: Some(numerator),
            denominator: Some(0.0),
        }
    }

    pub fn no_data() -> Self {
        Self {
            value: None,
            availability: MetricAvailability::NoData,
            numerator: None,
            denominator: None,
        }
    }
}

/// One row of a grouped result; `group` values align with the table's
/// `dimensions` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub group: Vec<String>,
    pub cell: MetricCell,
}

/// Tabular result for one metric: grouping key columns plus the value
/// column. Group keys with no data in the filtered set are simply absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricTable {
    pub id: MetricId,
    pub dimensions: Vec<Dimension>,
    /// Dataset-level availability: `NoData` when the filtered set is empty,
    /// `Unavailable` when a required column is missing entirely.
    pub availability: MetricAvailability,
    pub rows: Vec<MetricRow>,
}

impl MetricTable {
    pub fn unavailable(id: MetricId, dimensions: Vec<Dimension>) -> Self {
        Self {
            id,
            dimensions,
            availability: MetricAvailability::Unavailable,
            rows: vec![],
        }
    }

    pub fn no_data(id: MetricId, dimensions: Vec<Dimension>) -> Self {
        Self {
            id,
            dimensions,
            availability: MetricAvailability::NoData,
            rows: vec![],
        }
    }
}

// ---------------------------------------------------------------------------
// API request / response
// ---------------------------------------------------------------------------

/// Batch request: compute several metrics over one filtered cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeMetricsRequest {
    pub metric_ids: Vec<MetricId>,
    /// `None` means "use each metric's default grouping".
    #[serde(default)]
    pub grouping: Option<Vec<Dimension>>,
    #[serde(default)]
    pub criteria: FilterCriteria,
}

/// Batch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeMetricsResponse {
    pub tables: Vec<MetricTable>,
}
