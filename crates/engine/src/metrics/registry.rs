use contracts::domain::call_record::{CallType, OutcomeCategory};
use contracts::shared::metrics::{Dimension, MetricId};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::catalog::ids;

const INTRO_PRIMARY: &[CallType] = &[CallType::IntroCall];
const INTRO_FOLLOWUP: &[CallType] = &[CallType::IntroFollowup];
const SALES_PRIMARY: &[CallType] = &[CallType::SalesCall];
const SALES_FOLLOWUP: &[CallType] = &[CallType::SalesFollowup];
const DEFINED: &[OutcomeCategory] = &[OutcomeCategory::Defined];
const VAGUE: &[OutcomeCategory] = &[OutcomeCategory::Vague];
const DEFINED_OR_VAGUE: &[OutcomeCategory] = &[OutcomeCategory::Defined, OutcomeCategory::Vague];

/// A countable quantity over a group of records. Numerator and denominator
/// of every ratio metric are spelled out here, so the orientation of each
/// ratio is pinned in exactly one place.
#[derive(Debug, Clone, Copy)]
pub enum Quantity {
    CallsOfType(&'static [CallType]),
    CallsWithOutcome(&'static [OutcomeCategory]),
    AllCalls,
    PrimaryCalls,
    SterileCalls,
    DistinctLeads,
}

/// Shape of a metric's computation.
#[derive(Debug, Clone, Copy)]
pub enum MetricKind {
    /// numerator / denominator × scale, with the uniform zero-denominator
    /// policy (0.0, tagged, never NaN).
    Ratio {
        numerator: Quantity,
        denominator: Quantity,
        scale: f64,
    },
    /// Per-lead predicate: exactly one intro call, one sales call, zero
    /// follow-ups of either kind within the filtered window.
    OneCallClose,
    /// Duration share per call-type group within each outer group.
    TalkTimeShare,
    /// Mean of `average_quality`, unscored calls ignored.
    MeanQuality,
}

/// Columns a metric cannot do without. When the dataset never carried the
/// column, the metric reports unavailable instead of a misleading zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnRequirements {
    pub lead_id: bool,
    pub call_duration_sec: bool,
    pub average_quality: bool,
    pub main_objection_type: bool,
}

/// Declarative definition of one named metric.
#[derive(Debug, Clone)]
pub struct MetricDef {
    pub id: MetricId,
    pub kind: MetricKind,
    pub default_grouping: Vec<Dimension>,
    pub requires: ColumnRequirements,
}

/// Single source of truth for every named business ratio. Dashboard
/// variants read this table; none re-derive a formula.
pub struct MetricRegistry {
    defs: HashMap<String, MetricDef>,
}

static GLOBAL: Lazy<MetricRegistry> = Lazy::new(MetricRegistry::new);

impl MetricRegistry {
    pub fn global() -> &'static MetricRegistry {
        &GLOBAL
    }

    pub fn new() -> Self {
        let mut defs = HashMap::new();
        let mut insert = |def: MetricDef| {
            defs.insert(def.id.0.clone(), def);
        };

        // Friction is followup / primary: it rises when more follow-ups are
        // needed to progress a lead.
        insert(MetricDef {
            id: ids::intro_friction(),
            kind: MetricKind::Ratio {
                numerator: Quantity::CallsOfType(INTRO_FOLLOWUP),
                denominator: Quantity::CallsOfType(INTRO_PRIMARY),
                scale: 1.0,
            },
            default_grouping: vec![Dimension::Market],
            requires: ColumnRequirements::default(),
        });
        insert(MetricDef {
            id: ids::sales_friction(),
            kind: MetricKind::Ratio {
                numerator: Quantity::CallsOfType(SALES_FOLLOWUP),
                denominator: Quantity::CallsOfType(SALES_PRIMARY),
                scale: 1.0,
            },
            default_grouping: vec![Dimension::Market],
            requires: ColumnRequirements::default(),
        });
        insert(MetricDef {
            id: ids::viscosity_index(),
            kind: MetricKind::Ratio {
                numerator: Quantity::AllCalls,
                denominator: Quantity::DistinctLeads,
                scale: 1.0,
            },
            default_grouping: vec![Dimension::Manager],
            requires: ColumnRequirements {
                lead_id: true,
                ..Default::default()
            },
        });
        insert(MetricDef {
            id: ids::vague_rate(),
            kind: MetricKind::Ratio {
                numerator: Quantity::CallsWithOutcome(VAGUE),
                denominator: Quantity::AllCalls,
                scale: 100.0,
            },
            default_grouping: vec![Dimension::Market],
            requires: ColumnRequirements::default(),
        });
        insert(MetricDef {
            id: ids::defined_rate(),
            kind: MetricKind::Ratio {
                numerator: Quantity::CallsWithOutcome(DEFINED),
                denominator: Quantity::CallsWithOutcome(DEFINED_OR_VAGUE),
                scale: 100.0,
            },
            default_grouping: vec![Dimension::Manager],
            requires: ColumnRequirements::default(),
        });
        insert(MetricDef {
            id: ids::one_call_close_rate(),
            kind: MetricKind::OneCallClose,
            default_grouping: vec![Dimension::Pipeline],
            requires: ColumnRequirements {
                lead_id: true,
                ..Default::default()
            },
        });
        insert(MetricDef {
            id: ids::talk_time_share(),
            kind: MetricKind::TalkTimeShare,
            default_grouping: vec![Dimension::Pipeline, Dimension::CallTypeGroup],
            requires: ColumnRequirements {
                call_duration_sec: true,
                ..Default::default()
            },
        });
        insert(MetricDef {
            id: ids::avg_quality(),
            kind: MetricKind::MeanQuality,
            default_grouping: vec![],
            requires: ColumnRequirements {
                average_quality: true,
                ..Default::default()
            },
        });
        insert(MetricDef {
            id: ids::sterile_rate(),
            kind: MetricKind::Ratio {
                numerator: Quantity::SterileCalls,
                denominator: Quantity::PrimaryCalls,
                scale: 1.0,
            },
            default_grouping: vec![Dimension::Manager],
            requires: ColumnRequirements {
                main_objection_type: true,
                ..Default::default()
            },
        });

        Self { defs }
    }

    pub fn get(&self, id: &MetricId) -> Option<&MetricDef> {
        self.defs.get(&id.0)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDef> {
        self.defs.values()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_nine_metrics() {
        let r = MetricRegistry::new();
        assert_eq!(r.len(), 9);
        for id in [
            ids::intro_friction(),
            ids::sales_friction(),
            ids::viscosity_index(),
            ids::vague_rate(),
            ids::defined_rate(),
            ids::one_call_close_rate(),
            ids::talk_time_share(),
            ids::avg_quality(),
            ids::sterile_rate(),
        ] {
            assert!(r.get(&id).is_some(), "missing {}", id.0);
        }
    }

    #[test]
    fn test_friction_orientation_is_followup_over_primary() {
        let r = MetricRegistry::new();
        let def = r.get(&ids::intro_friction()).unwrap();
        match def.kind {
            MetricKind::Ratio {
                numerator: Quantity::CallsOfType(num),
                denominator: Quantity::CallsOfType(den),
                ..
            } => {
                assert_eq!(num, &[CallType::IntroFollowup]);
                assert_eq!(den, &[CallType::IntroCall]);
            }
            _ => panic!("intro friction must be a call-count ratio"),
        }
    }

    #[test]
    fn test_lead_metrics_declare_lead_requirement() {
        let r = MetricRegistry::new();
        assert!(r.get(&ids::viscosity_index()).unwrap().requires.lead_id);
        assert!(r.get(&ids::one_call_close_rate()).unwrap().requires.lead_id);
        assert!(!r.get(&ids::vague_rate()).unwrap().requires.lead_id);
    }
}
