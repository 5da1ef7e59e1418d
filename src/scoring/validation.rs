use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, weight) in [
        ("commute_weight", config.commute_weight),
        ("room_weight", config.room_weight),
        ("size_weight", config.size_weight),
        ("rent_weight", config.rent_weight),
    ] {
        if let Some(w) = weight {
            if !w.is_finite() {
                errors.push(format!("scoring.{}: must be a finite number", name));
            } else if w < 0.0 {
                errors.push(format!("scoring.{}: must be non-negative", name));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig {
            commute_weight: None,
            room_weight: None,
            size_weight: None,
            rent_weight: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_negative_weight() {
        let config = ScoringConfig {
            rent_weight: Some(-0.9),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.rent_weight"));
    }

    #[test]
    fn test_non_finite_weight() {
        let config = ScoringConfig {
            size_weight: Some(f64::NAN),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("finite"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            commute_weight: Some(-1.0),
            room_weight: Some(f64::INFINITY),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
