mod engine;
mod weights;

pub use engine::{
    find_matches, MatchBand, MatchOutcome, MatchedIdea, ScoreBreakdown, MAX_TOP_K,
};
pub use weights::MatchWeights;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::stores::idea_store::decode_string_list;
use crate::types::db::investor_preference;
use crate::types::domain::{IdeaStage, InvestmentTimeline, RiskTolerance};

/// What an investor is looking for. Empty sets mean "no constraint".
///
/// Serializes with wire names, so it doubles as the match-history snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPreferences {
    pub industries: Vec<String>,
    pub stages: Vec<IdeaStage>,
    pub regions: Vec<String>,
    pub funding_min: i64,
    pub funding_max: i64,
    pub risk_tolerance: RiskTolerance,
    pub timeline: InvestmentTimeline,
}

impl MatchPreferences {
    /// Rehydrate preferences from their persisted row
    ///
    /// The row was written by us, so unknown enum values mean the column is
    /// corrupt, not that the caller made a bad request.
    pub fn from_saved(model: &investor_preference::Model) -> Result<Self, StoreError> {
        let stages = decode_string_list(&model.stages)
            .iter()
            .map(|raw| {
                IdeaStage::parse(raw).ok_or_else(|| StoreError::Corrupt {
                    column: "stages",
                    message: format!("unknown stage '{raw}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let risk_tolerance =
            RiskTolerance::parse(&model.risk_tolerance).ok_or_else(|| StoreError::Corrupt {
                column: "risk_tolerance",
                message: format!("unknown risk tolerance '{}'", model.risk_tolerance),
            })?;

        let timeline =
            InvestmentTimeline::parse(&model.timeline).ok_or_else(|| StoreError::Corrupt {
                column: "timeline",
                message: format!("unknown timeline '{}'", model.timeline),
            })?;

        Ok(Self {
            industries: decode_string_list(&model.industries),
            stages,
            regions: decode_string_list(&model.regions),
            funding_min: model.funding_min,
            funding_max: model.funding_max,
            risk_tolerance,
            timeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_saved_round_trips_valid_rows() {
        let model = investor_preference::Model {
            investor_id: "inv-1".to_string(),
            industries: r#"["ai_ml"]"#.to_string(),
            stages: r#"["seed","growth"]"#.to_string(),
            regions: r#"["europe"]"#.to_string(),
            funding_min: 1_000,
            funding_max: 100_000,
            risk_tolerance: "medium".to_string(),
            timeline: "6_months".to_string(),
            updated_at: 0,
        };

        let prefs = MatchPreferences::from_saved(&model).expect("valid row");
        assert_eq!(prefs.stages, vec![IdeaStage::Seed, IdeaStage::Growth]);
        assert_eq!(prefs.timeline, InvestmentTimeline::SixMonths);
    }

    #[test]
    fn from_saved_flags_corrupt_enum_values() {
        let model = investor_preference::Model {
            investor_id: "inv-1".to_string(),
            industries: "[]".to_string(),
            stages: r#"["unicorn"]"#.to_string(),
            regions: "[]".to_string(),
            funding_min: 0,
            funding_max: 0,
            risk_tolerance: "medium".to_string(),
            timeline: "6_months".to_string(),
            updated_at: 0,
        };

        let result = MatchPreferences::from_saved(&model);
        assert!(matches!(
            result,
            Err(StoreError::Corrupt { column: "stages", .. })
        ));
    }

    #[test]
    fn snapshot_serialization_uses_wire_names() {
        let prefs = MatchPreferences {
            industries: vec!["fintech".to_string()],
            stages: vec![IdeaStage::Mvp],
            regions: vec![],
            funding_min: 0,
            funding_max: 10,
            risk_tolerance: RiskTolerance::High,
            timeline: InvestmentTimeline::TwoYearsPlus,
        };

        let json = serde_json::to_string(&prefs).expect("serialize");
        assert!(json.contains(r#""mvp""#));
        assert!(json.contains(r#""2_years_plus""#));
    }
}
