use serde::{Deserialize, Serialize};

/// Weights applied to the normalized scoring factors.
///
/// Every factor scales to [0, 1] before weighting, so a weight is the
/// number of points that factor can swing in the composite score.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   commute_weight: 1.0
///   room_weight: 0.3
///   size_weight: 0.5
///   rent_weight: 0.9
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight of the commute-time factor; shorter commutes score higher
    /// (default: 1.0)
    #[serde(default)]
    pub commute_weight: Option<f64>,

    /// Weight of the room-count factor; two-room flats score higher than
    /// three-room flats (default: 0.3)
    #[serde(default)]
    pub room_weight: Option<f64>,

    /// Weight of the unit-size factor; larger rooms score higher
    /// (default: 0.5)
    #[serde(default)]
    pub size_weight: Option<f64>,

    /// Weight of the rent factor; cheaper rooms score higher (default: 0.9)
    #[serde(default)]
    pub rent_weight: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            commute_weight: Some(1.0),
            room_weight: Some(0.3),
            size_weight: Some(0.5),
            rent_weight: Some(0.9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.commute_weight, Some(1.0));
        assert_eq!(config.room_weight, Some(0.3));
        assert_eq!(config.size_weight, Some(0.5));
        assert_eq!(config.rent_weight, Some(0.9));
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
commute_weight: 2.0
rent_weight: 0.5
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.commute_weight, Some(2.0));
        assert_eq!(config.rent_weight, Some(0.5));
        assert!(config.room_weight.is_none());
        assert!(config.size_weight.is_none());
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let yaml = "{}";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.commute_weight.is_none());
        assert!(config.room_weight.is_none());
        assert!(config.size_weight.is_none());
        assert!(config.rent_weight.is_none());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let yaml = "adjacency_weight: 0.9";
        assert!(serde_saphyr::from_str::<ScoringConfig>(yaml).is_err());
    }
}
