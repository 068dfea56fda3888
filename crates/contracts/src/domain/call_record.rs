use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Market
// ============================================================================

/// Market a call belongs to. Always resolves to one of the bounded codes;
/// anything unrecognised lands in `Others`, never in an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Market {
    #[serde(rename = "CZ")]
    Cz,
    #[serde(rename = "SK")]
    Sk,
    #[serde(rename = "RUK")]
    Ruk,
    #[serde(rename = "Others")]
    Others,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Cz => "CZ",
            Market::Sk => "SK",
            Market::Ruk => "RUK",
            Market::Others => "Others",
        }
    }

    /// Parse an explicit market code coming from the data source.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "CZ" => Market::Cz,
            "SK" => Market::Sk,
            "RUK" => Market::Ruk,
            _ => Market::Others,
        }
    }

    /// Infer the market from a pipeline label by prefix.
    ///
    /// Prefixes are tested case-insensitively in the order CZ, SK, RUK;
    /// the first match wins, everything else is `Others`.
    pub fn from_pipeline(pipeline_name: &str) -> Self {
        let p = pipeline_name.trim().to_uppercase();
        if p.starts_with("CZ") {
            Market::Cz
        } else if p.starts_with("SK") {
            Market::Sk
        } else if p.starts_with("RUK") {
            Market::Ruk
        } else {
            Market::Others
        }
    }
}

// ============================================================================
// Call type
// ============================================================================

/// The four tracked call types. Calls with any other type string carry
/// `None` and are ignored by friction and talk-time computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    IntroCall,
    IntroFollowup,
    SalesCall,
    SalesFollowup,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::IntroCall => "intro_call",
            CallType::IntroFollowup => "intro_followup",
            CallType::SalesCall => "sales_call",
            CallType::SalesFollowup => "sales_followup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "intro_call" => Some(CallType::IntroCall),
            "intro_followup" => Some(CallType::IntroFollowup),
            "sales_call" => Some(CallType::SalesCall),
            "sales_followup" => Some(CallType::SalesFollowup),
            _ => None,
        }
    }

    /// Primary calls open a funnel stage (intro or sales).
    pub fn is_primary(&self) -> bool {
        matches!(self, CallType::IntroCall | CallType::SalesCall)
    }

    pub fn is_followup(&self) -> bool {
        matches!(self, CallType::IntroFollowup | CallType::SalesFollowup)
    }

    /// Display label used when grouping by call-type group.
    pub fn group_label(&self) -> &'static str {
        match self {
            CallType::IntroCall => "Intro Call",
            CallType::IntroFollowup => "Intro Flup",
            CallType::SalesCall => "Sales Call",
            CallType::SalesFollowup => "Sales Flup",
        }
    }

    pub fn all() -> &'static [CallType] {
        &[
            CallType::IntroCall,
            CallType::IntroFollowup,
            CallType::SalesCall,
            CallType::SalesFollowup,
        ]
    }
}

// ============================================================================
// Outcome category
// ============================================================================

/// Three-way classification of the free-text `next_step_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
    Defined,
    Vague,
    Other,
}

impl OutcomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCategory::Defined => "Defined",
            OutcomeCategory::Vague => "Vague",
            OutcomeCategory::Other => "Other",
        }
    }
}

// ============================================================================
// Call record
// ============================================================================

/// One row per phone-call event, as produced by the normalizer.
///
/// Read-only from the core's perspective: the upstream ingestion pipeline
/// owns the data, every render recomputes from source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_id: String,
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub call_datetime: Option<DateTime<Utc>>,
    /// Calendar date derived from `call_datetime`; used for filtering and bucketing.
    #[serde(default)]
    pub call_date: Option<NaiveDate>,
    #[serde(default)]
    pub pipeline_name: Option<String>,
    pub market: Market,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub call_type: Option<CallType>,
    /// Non-negative; coerced to 0 on parse failure.
    #[serde(default)]
    pub call_duration_sec: f64,
    /// 0–10 scale, absent when not scored.
    #[serde(default)]
    pub average_quality: Option<f64>,
    #[serde(default)]
    pub next_step_type: Option<String>,
    #[serde(default)]
    pub main_objection_type: Option<String>,
}
