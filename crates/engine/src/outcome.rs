use contracts::domain::call_record::{CallRecord, OutcomeCategory};

/// Substrings that mark a concrete, scheduled next step.
const DEFINED_MARKERS: [&str; 4] = [
    "lesson_scheduled",
    "callback_scheduled",
    "payment_pending",
    "sold",
];

/// Map the free-text `next_step_type` into exactly one category.
///
/// Defined markers are checked before the vague marker, first match wins:
/// `callback_vague` contains no Defined marker and therefore classifies as
/// `Vague`, never both. Null and empty text is `Other`.
pub fn classify(next_step_type: Option<&str>) -> OutcomeCategory {
    let ns = match next_step_type {
        Some(s) => s.to_lowercase(),
        None => return OutcomeCategory::Other,
    };
    if DEFINED_MARKERS.iter().any(|m| ns.contains(m)) {
        return OutcomeCategory::Defined;
    }
    if ns.contains("vague") {
        return OutcomeCategory::Vague;
    }
    OutcomeCategory::Other
}

/// Tunable sub-rules of the outcome classification.
#[derive(Debug, Clone)]
pub struct OutcomeRules {
    /// A vague call longer than this counts as operational waste.
    pub waste_duration_threshold_sec: f64,
}

impl Default for OutcomeRules {
    fn default() -> Self {
        Self {
            waste_duration_threshold_sec: 900.0,
        }
    }
}

/// Long call that still ended without a concrete next step.
pub fn is_operational_waste(record: &CallRecord, rules: &OutcomeRules) -> bool {
    classify(record.next_step_type.as_deref()) == OutcomeCategory::Vague
        && record.call_duration_sec > rules.waste_duration_threshold_sec
}

/// A primary call with no recorded objection: a discovery-quality red
/// flag, not a success signal.
pub fn is_sterile(record: &CallRecord) -> bool {
    record
        .call_type
        .map(|t| t.is_primary())
        .unwrap_or(false)
        && record.main_objection_type.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::call_record::{CallType, Market};

    fn record(next_step: &str, call_type: Option<CallType>, duration: f64) -> CallRecord {
        CallRecord {
            call_id: "c".into(),
            lead_id: None,
            call_datetime: None,
            call_date: None,
            pipeline_name: None,
            market: Market::Others,
            manager: None,
            call_type,
            call_duration_sec: duration,
            average_quality: None,
            next_step_type: Some(next_step.into()),
            main_objection_type: None,
        }
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(classify(Some("lesson_scheduled")), OutcomeCategory::Defined);
        assert_eq!(classify(Some("CALLBACK_SCHEDULED")), OutcomeCategory::Defined);
        assert_eq!(classify(Some("payment_pending")), OutcomeCategory::Defined);
        assert_eq!(classify(Some("sold_full_course")), OutcomeCategory::Defined);
        assert_eq!(classify(Some("vague_promise")), OutcomeCategory::Vague);
        assert_eq!(classify(Some("no_answer")), OutcomeCategory::Other);
        assert_eq!(classify(Some("")), OutcomeCategory::Other);
        assert_eq!(classify(None), OutcomeCategory::Other);
    }

    #[test]
    fn test_callback_vague_is_vague() {
        // Contains "callback" but not "callback_scheduled", so the Defined
        // check does not fire and first-match-wins lands on Vague.
        assert_eq!(classify(Some("callback_vague")), OutcomeCategory::Vague);
    }

    #[test]
    fn test_operational_waste_threshold() {
        let rules = OutcomeRules::default();
        assert!(is_operational_waste(
            &record("callback_vague", None, 901.0),
            &rules
        ));
        assert!(!is_operational_waste(
            &record("callback_vague", None, 900.0),
            &rules
        ));
        assert!(!is_operational_waste(
            &record("lesson_scheduled", None, 2000.0),
            &rules
        ));
    }

    #[test]
    fn test_sterile_needs_primary_call() {
        let mut r = record("no_answer", Some(CallType::IntroCall), 60.0);
        assert!(is_sterile(&r));
        r.main_objection_type = Some("price".into());
        assert!(!is_sterile(&r));
        let fu = record("no_answer", Some(CallType::IntroFollowup), 60.0);
        assert!(!is_sterile(&fu));
        let untyped = record("no_answer", None, 60.0);
        assert!(!is_sterile(&untyped));
    }
}
