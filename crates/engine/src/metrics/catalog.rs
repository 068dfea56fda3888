use contracts::shared::metrics::{MetricCatalogResponse, MetricId, MetricMeta, ValueFormat};

/// Well-known metric IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn intro_friction() -> MetricId {
        MetricId::new("intro_friction")
    }
    pub fn sales_friction() -> MetricId {
        MetricId::new("sales_friction")
    }
    pub fn viscosity_index() -> MetricId {
        MetricId::new("viscosity_index")
    }
    pub fn vague_rate() -> MetricId {
        MetricId::new("vague_rate")
    }
    pub fn defined_rate() -> MetricId {
        MetricId::new("defined_rate")
    }
    pub fn one_call_close_rate() -> MetricId {
        MetricId::new("one_call_close_rate")
    }
    pub fn talk_time_share() -> MetricId {
        MetricId::new("talk_time_share")
    }
    pub fn avg_quality() -> MetricId {
        MetricId::new("avg_quality")
    }
    pub fn sterile_rate() -> MetricId {
        MetricId::new("sterile_rate")
    }
}

/// Build the full catalogue of metric display metadata.
pub fn build_catalog() -> MetricCatalogResponse {
    let metrics = vec![
        MetricMeta {
            id: ids::intro_friction(),
            label: "Intro Friction".into(),
            short_label: None,
            icon: "phone-incoming".into(),
            format: ValueFormat::Number { decimals: 2 },
            description: Some("Intro follow-ups per intro call; rises when leads need more touches".into()),
        },
        MetricMeta {
            id: ids::sales_friction(),
            label: "Sales Friction".into(),
            short_label: None,
            icon: "phone-outgoing".into(),
            format: ValueFormat::Number { decimals: 2 },
            description: Some("Sales follow-ups per sales call".into()),
        },
        MetricMeta {
            id: ids::viscosity_index(),
            label: "Viscosity Index".into(),
            short_label: Some("Viscosity".into()),
            icon: "droplets".into(),
            format: ValueFormat::Number { decimals: 2 },
            description: Some("Average calls needed to process one lead".into()),
        },
        MetricMeta {
            id: ids::vague_rate(),
            label: "Vague Rate".into(),
            short_label: None,
            icon: "cloud-fog".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some("Share of calls ending without a concrete next step".into()),
        },
        MetricMeta {
            id: ids::defined_rate(),
            label: "Defined Rate".into(),
            short_label: None,
            icon: "check-circle".into(),
            format: ValueFormat::Percent { decimals: 2 },
            description: Some("Defined outcomes among Defined + Vague".into()),
        },
        MetricMeta {
            id: ids::one_call_close_rate(),
            label: "One-Call-Close Rate".into(),
            short_label: Some("OCC".into()),
            icon: "zap".into(),
            format: ValueFormat::Percent { decimals: 2 },
            description: Some("Leads closed with exactly one intro and one sales call, no follow-ups".into()),
        },
        MetricMeta {
            id: ids::talk_time_share(),
            label: "Talk-Time Share".into(),
            short_label: None,
            icon: "clock".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some("Share of a pipeline's talk minutes per call-type group".into()),
        },
        MetricMeta {
            id: ids::avg_quality(),
            label: "Avg Quality".into(),
            short_label: None,
            icon: "star".into(),
            format: ValueFormat::Number { decimals: 2 },
            description: Some("Mean quality score, unscored calls ignored".into()),
        },
        MetricMeta {
            id: ids::sterile_rate(),
            label: "Sterile Rate".into(),
            short_label: None,
            icon: "mic-off".into(),
            format: ValueFormat::Number { decimals: 2 },
            description: Some("Primary calls with no recorded objection".into()),
        },
    ];

    MetricCatalogResponse { metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::registry::MetricRegistry;

    #[test]
    fn test_catalog_covers_registry() {
        let catalog = build_catalog();
        let registry = MetricRegistry::new();
        assert_eq!(catalog.metrics.len(), 9);
        for meta in &catalog.metrics {
            assert!(
                registry.get(&meta.id).is_some(),
                "catalog metric {} missing from registry",
                meta.id.0
            );
        }
    }
}
