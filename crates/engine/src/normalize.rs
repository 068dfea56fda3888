use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::call_record::{CallRecord, CallType, Market};
use serde_json::Value;

/// Raw tabular row from the external data source: column name -> raw value.
pub type RawRow = serde_json::Map<String, Value>;

/// Which optional columns were present in the raw data at all.
///
/// Drives the per-metric "unavailable" policy: a metric that needs
/// `lead_id` reports unavailable when the column never appeared, instead
/// of producing a misleading zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnCoverage {
    pub lead_id: bool,
    pub call_duration_sec: bool,
    pub average_quality: bool,
    pub main_objection_type: bool,
}

/// Normalized, typed record set plus column coverage.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<CallRecord>,
    pub coverage: ColumnCoverage,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Turn heterogeneous raw rows into typed, market-tagged records.
///
/// Never drops a row and never errors: an unparseable date or number is
/// coerced to null/0 and the record proceeds. Running the normalizer over
/// its own serialized output is a fixed point.
pub fn normalize_rows(rows: &[RawRow]) -> Dataset {
    let mut coverage = ColumnCoverage::default();
    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        coverage.lead_id |= has_column(row, "lead_id");
        coverage.call_duration_sec |= has_column(row, "call_duration_sec");
        coverage.average_quality |= has_column(row, "average_quality");
        coverage.main_objection_type |= has_column(row, "main_objection_type");

        records.push(normalize_row(row, idx));
    }

    Dataset { records, coverage }
}

fn normalize_row(row: &RawRow, idx: usize) -> CallRecord {
    let call_datetime = get_str(row, "call_datetime").and_then(|s| parse_datetime(&s));
    // Prefer the date derived from the timestamp; fall back to an explicit
    // call_date column when the source ships only a calendar date.
    let call_date = call_datetime
        .map(|dt| dt.date_naive())
        .or_else(|| get_str(row, "call_date").and_then(|s| parse_date(&s)));

    let pipeline_name = get_str(row, "pipeline_name");
    let market = match get_str(row, "market") {
        Some(code) => Market::from_code(&code),
        None => pipeline_name
            .as_deref()
            .map(Market::from_pipeline)
            .unwrap_or(Market::Others),
    };

    let call_duration_sec = match get_f64(row, "call_duration_sec") {
        Some(d) if d >= 0.0 => d,
        Some(d) => {
            tracing::warn!("negative call_duration_sec {d} coerced to 0");
            0.0
        }
        None => 0.0,
    };

    CallRecord {
        call_id: get_str(row, "call_id").unwrap_or_else(|| format!("row_{idx}")),
        lead_id: get_str(row, "lead_id"),
        call_datetime,
        call_date,
        pipeline_name,
        market,
        manager: get_str(row, "manager"),
        call_type: get_str(row, "call_type").and_then(|s| CallType::parse(&s)),
        call_duration_sec,
        average_quality: get_f64(row, "average_quality"),
        next_step_type: get_str(row, "next_step_type"),
        main_objection_type: get_str(row, "main_objection_type").filter(|s| {
            // "None"/"nan" placeholders from upstream exports mean "no objection".
            !matches!(s.to_lowercase().as_str(), "none" | "nan" | "null")
        }),
    }
}

/// Column lookup: exact key first, then case-insensitive (the upstream
/// view exports `Average_quality` with a capital A).
fn get<'a>(row: &'a RawRow, key: &str) -> Option<&'a Value> {
    if let Some(v) = row.get(key) {
        return Some(v);
    }
    row.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

/// A column counts as present only when it carries a non-null value in at
/// least one row; an all-null column is as missing as no column at all.
fn has_column(row: &RawRow, key: &str) -> bool {
    get(row, key).map(|v| !v.is_null()).unwrap_or(false)
}

fn get_str(row: &RawRow, key: &str) -> Option<String> {
    match get(row, key)? {
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn get_f64(row: &RawRow, key: &str) -> Option<f64> {
    match get(row, key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Timestamps without an offset come straight from SQL exports.
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
