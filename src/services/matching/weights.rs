use std::env;

use crate::config::SettingsError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative weight of each sub-score in the composite.
///
/// Tunable per deployment through `MATCH_WEIGHT_*` variables; the set must
/// still sum to 1.0 so scores stay comparable across configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchWeights {
    pub industry: f64,
    pub stage: f64,
    pub funding: f64,
    pub geography: f64,
    pub risk_timeline: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            industry: 0.30,
            stage: 0.20,
            funding: 0.20,
            geography: 0.15,
            risk_timeline: 0.15,
        }
    }
}

impl MatchWeights {
    /// Load weights, applying any `MATCH_WEIGHT_*` environment overrides
    ///
    /// Called once at startup; an invalid override set fails the boot rather
    /// than silently skewing every match.
    pub fn from_env() -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let weights = Self {
            industry: read_weight("MATCH_WEIGHT_INDUSTRY", defaults.industry)?,
            stage: read_weight("MATCH_WEIGHT_STAGE", defaults.stage)?,
            funding: read_weight("MATCH_WEIGHT_FUNDING", defaults.funding)?,
            geography: read_weight("MATCH_WEIGHT_GEOGRAPHY", defaults.geography)?,
            risk_timeline: read_weight("MATCH_WEIGHT_RISK_TIMELINE", defaults.risk_timeline)?,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let parts = [
            self.industry,
            self.stage,
            self.funding,
            self.geography,
            self.risk_timeline,
        ];

        if parts.iter().any(|w| !(0.0..=1.0).contains(w)) {
            return Err(SettingsError::Invalid {
                name: "MATCH_WEIGHT_*",
                message: "each weight must be within [0, 1]".to_string(),
            });
        }

        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SettingsError::Invalid {
                name: "MATCH_WEIGHT_*",
                message: format!("weights must sum to 1.0, got {sum}"),
            });
        }

        Ok(())
    }
}

fn read_weight(name: &'static str, default: f64) -> Result<f64, SettingsError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<f64>().map_err(|_| SettingsError::Invalid {
            name,
            message: format!("'{raw}' is not a number"),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Weight tests mutate process environment; serialize them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const WEIGHT_VARS: [&str; 5] = [
        "MATCH_WEIGHT_INDUSTRY",
        "MATCH_WEIGHT_STAGE",
        "MATCH_WEIGHT_FUNDING",
        "MATCH_WEIGHT_GEOGRAPHY",
        "MATCH_WEIGHT_RISK_TIMELINE",
    ];

    fn clear_weight_vars() {
        for var in WEIGHT_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_sum_to_one_and_validate() {
        let weights = MatchWeights::default();
        assert!(weights.validate().is_ok());

        let sum = weights.industry
            + weights.stage
            + weights.funding
            + weights.geography
            + weights.risk_timeline;
        assert!((sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn from_env_without_overrides_returns_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_weight_vars();

        let weights = MatchWeights::from_env().expect("defaults are valid");
        assert_eq!(weights, MatchWeights::default());
    }

    #[test]
    fn from_env_applies_a_consistent_override_set() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_weight_vars();

        env::set_var("MATCH_WEIGHT_INDUSTRY", "0.40");
        env::set_var("MATCH_WEIGHT_STAGE", "0.10");

        let weights = MatchWeights::from_env().expect("override set sums to 1.0");
        assert_eq!(weights.industry, 0.40);
        assert_eq!(weights.stage, 0.10);
        assert_eq!(weights.funding, 0.20);

        clear_weight_vars();
    }

    #[test]
    fn from_env_rejects_overrides_that_break_the_sum() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_weight_vars();

        env::set_var("MATCH_WEIGHT_INDUSTRY", "0.90");

        let result = MatchWeights::from_env();
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                name: "MATCH_WEIGHT_*",
                ..
            })
        ));

        clear_weight_vars();
    }

    #[test]
    fn from_env_rejects_non_numeric_values() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_weight_vars();

        env::set_var("MATCH_WEIGHT_FUNDING", "lots");

        let result = MatchWeights::from_env();
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                name: "MATCH_WEIGHT_FUNDING",
                ..
            })
        ));

        clear_weight_vars();
    }

    #[test]
    fn validate_rejects_out_of_range_weights() {
        let weights = MatchWeights {
            industry: -0.1,
            stage: 0.3,
            funding: 0.3,
            geography: 0.25,
            risk_timeline: 0.25,
        };
        assert!(weights.validate().is_err());
    }
}
