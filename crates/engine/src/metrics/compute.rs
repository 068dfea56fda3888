use chrono::Datelike;
use contracts::domain::call_record::{CallRecord, CallType};
use contracts::shared::metrics::{
    DateBucket, Dimension, MetricAvailability, MetricCell, MetricRow, MetricTable,
};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::registry::{ColumnRequirements, MetricDef, MetricKind, Quantity};
use crate::normalize::{ColumnCoverage, Dataset};
use crate::outcome::{classify, is_sterile};

/// Compute one metric table over an already-filtered dataset.
///
/// Dataset-level failures surface in `MetricTable::availability`; group
/// keys with no matching records are simply absent from `rows`.
pub fn compute_table(dataset: &Dataset, def: &MetricDef, dims: &[Dimension]) -> MetricTable {
    if !requirements_met(&def.requires, &dataset.coverage) {
        return MetricTable::unavailable(def.id.clone(), dims.to_vec());
    }
    if dataset.is_empty() {
        return MetricTable::no_data(def.id.clone(), dims.to_vec());
    }

    match def.kind {
        MetricKind::Ratio {
            numerator,
            denominator,
            scale,
        } => ratio_table(dataset, def, dims, numerator, denominator, scale),
        MetricKind::OneCallClose => one_call_close_table(dataset, def, dims),
        MetricKind::TalkTimeShare => talk_time_table(dataset, def, dims),
        MetricKind::MeanQuality => mean_quality_table(dataset, def, dims),
    }
}

fn requirements_met(req: &ColumnRequirements, coverage: &ColumnCoverage) -> bool {
    (!req.lead_id || coverage.lead_id)
        && (!req.call_duration_sec || coverage.call_duration_sec)
        && (!req.average_quality || coverage.average_quality)
        && (!req.main_objection_type || coverage.main_objection_type)
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

fn bucket_key(date: chrono::NaiveDate, bucket: DateBucket) -> String {
    match bucket {
        DateBucket::Day => date.format("%Y-%m-%d").to_string(),
        DateBucket::Week => {
            let iso = date.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        DateBucket::Month => date.format("%Y-%m").to_string(),
    }
}

fn dim_value(record: &CallRecord, dim: &Dimension) -> Option<String> {
    match dim {
        Dimension::Market => Some(record.market.as_str().to_string()),
        Dimension::Pipeline => record.pipeline_name.clone(),
        Dimension::Manager => record.manager.clone(),
        Dimension::CallTypeGroup => record.call_type.map(|t| t.group_label().to_string()),
        Dimension::Date { bucket } => record.call_date.map(|d| bucket_key(d, *bucket)),
    }
}

fn group_key(record: &CallRecord, dims: &[Dimension]) -> Option<Vec<String>> {
    dims.iter().map(|d| dim_value(record, d)).collect()
}

/// Group records by dimension values. A record missing any grouping value
/// is excluded from the grouping; BTreeMap keeps the row order stable.
fn group_records<'a>(
    records: &'a [CallRecord],
    dims: &[Dimension],
) -> BTreeMap<Vec<String>, Vec<&'a CallRecord>> {
    let mut groups: BTreeMap<Vec<String>, Vec<&'a CallRecord>> = BTreeMap::new();
    for record in records {
        if let Some(key) = group_key(record, dims) {
            groups.entry(key).or_default().push(record);
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

fn count_quantity(records: &[&CallRecord], quantity: Quantity) -> f64 {
    let n = match quantity {
        Quantity::CallsOfType(types) => records
            .iter()
            .filter(|r| r.call_type.map(|t| types.contains(&t)).unwrap_or(false))
            .count(),
        Quantity::CallsWithOutcome(categories) => records
            .iter()
            .filter(|r| categories.contains(&classify(r.next_step_type.as_deref())))
            .count(),
        Quantity::AllCalls => records.len(),
        Quantity::PrimaryCalls => records
            .iter()
            .filter(|r| r.call_type.map(|t| t.is_primary()).unwrap_or(false))
            .count(),
        Quantity::SterileCalls => records.iter().filter(|r| is_sterile(r)).count(),
        Quantity::DistinctLeads => records
            .iter()
            .filter_map(|r| r.lead_id.as_deref())
            .collect::<HashSet<_>>()
            .len(),
    };
    n as f64
}

/// The uniform zero-denominator policy: 0.0 tagged as such, never NaN.
fn ratio_cell(numerator: f64, denominator: f64, scale: f64) -> MetricCell {
    if denominator == 0.0 {
        MetricCell::zero_denominator(numerator)
    } else {
        MetricCell::computed(numerator / denominator * scale, numerator, denominator)
    }
}

// ---------------------------------------------------------------------------
// Metric shapes
// ---------------------------------------------------------------------------

fn ratio_table(
    dataset: &Dataset,
    def: &MetricDef,
    dims: &[Dimension],
    numerator: Quantity,
    denominator: Quantity,
    scale: f64,
) -> MetricTable {
    let rows = group_records(&dataset.records, dims)
        .into_iter()
        .map(|(group, records)| {
            let num = count_quantity(&records, numerator);
            let den = count_quantity(&records, denominator);
            MetricRow {
                group,
                cell: ratio_cell(num, den, scale),
            }
        })
        .collect();

    MetricTable {
        id: def.id.clone(),
        dimensions: dims.to_vec(),
        availability: MetricAvailability::Computed,
        rows,
    }
}

/// Per-lead call-type tallies, kept small on purpose.
#[derive(Default)]
struct LeadTally {
    intro: u32,
    intro_fu: u32,
    sales: u32,
    sales_fu: u32,
}

impl LeadTally {
    fn add(&mut self, call_type: CallType) {
        match call_type {
            CallType::IntroCall => self.intro += 1,
            CallType::IntroFollowup => self.intro_fu += 1,
            CallType::SalesCall => self.sales += 1,
            CallType::SalesFollowup => self.sales_fu += 1,
        }
    }

    /// Exactly one intro, one sales, zero follow-ups of either kind.
    fn is_one_call_close(&self) -> bool {
        self.intro == 1 && self.sales == 1 && self.intro_fu == 0 && self.sales_fu == 0
    }
}

fn one_call_close_table(dataset: &Dataset, def: &MetricDef, dims: &[Dimension]) -> MetricTable {
    let rows = group_records(&dataset.records, dims)
        .into_iter()
        .map(|(group, records)| {
            let mut tallies: HashMap<&str, LeadTally> = HashMap::new();
            for record in &records {
                let Some(lead) = record.lead_id.as_deref() else {
                    continue;
                };
                let tally = tallies.entry(lead).or_default();
                if let Some(call_type) = record.call_type {
                    tally.add(call_type);
                }
            }

            let total_leads = tallies.len() as f64;
            let occ_leads = tallies.values().filter(|t| t.is_one_call_close()).count() as f64;
            MetricRow {
                group,
                cell: ratio_cell(occ_leads, total_leads, 100.0),
            }
        })
        .collect();

    MetricTable {
        id: def.id.clone(),
        dimensions: dims.to_vec(),
        availability: MetricAvailability::Computed,
        rows,
    }
}

fn talk_time_table(dataset: &Dataset, def: &MetricDef, dims: &[Dimension]) -> MetricTable {
    // The call-type split is intrinsic to this metric; outer dimensions are
    // whatever else the caller asked for (pipeline by default).
    let outer_dims: Vec<Dimension> = dims
        .iter()
        .copied()
        .filter(|d| *d != Dimension::CallTypeGroup)
        .collect();
    let mut result_dims = outer_dims.clone();
    result_dims.push(Dimension::CallTypeGroup);

    let mut rows = Vec::new();
    for (outer_key, records) in group_records(&dataset.records, &outer_dims) {
        let mut seconds_by_group: BTreeMap<&'static str, f64> = BTreeMap::new();
        for record in &records {
            if let Some(call_type) = record.call_type {
                *seconds_by_group.entry(call_type.group_label()).or_insert(0.0) +=
                    record.call_duration_sec;
            }
        }
        let total: f64 = seconds_by_group.values().sum();

        for (label, seconds) in seconds_by_group {
            let mut group = outer_key.clone();
            group.push(label.to_string());
            rows.push(MetricRow {
                group,
                cell: ratio_cell(seconds, total, 100.0),
            });
        }
    }

    MetricTable {
        id: def.id.clone(),
        dimensions: result_dims,
        availability: MetricAvailability::Computed,
        rows,
    }
}

fn mean_quality_table(dataset: &Dataset, def: &MetricDef, dims: &[Dimension]) -> MetricTable {
    let rows = group_records(&dataset.records, dims)
        .into_iter()
        .map(|(group, records)| {
            let scored: Vec<f64> = records.iter().filter_map(|r| r.average_quality).collect();
            let cell = if scored.is_empty() {
                // Sentinel "no data", visually distinct from a true zero.
                MetricCell::no_data()
            } else {
                let sum: f64 = scored.iter().sum();
                let count = scored.len() as f64;
                MetricCell::computed(sum / count, sum, count)
            };
            MetricRow { group, cell }
        })
        .collect();

    MetricTable {
        id: def.id.clone(),
        dimensions: dims.to_vec(),
        availability: MetricAvailability::Computed,
        rows,
    }
}
