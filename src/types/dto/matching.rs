use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::services::matching::{MatchPreferences, MatchedIdea, ScoreBreakdown};
use crate::stores::idea_store::decode_string_list;
use crate::types::db::match_history;
use crate::types::domain::{IdeaStage, InvestmentTimeline, RiskTolerance};
use crate::types::dto::ideas::IdeaResponse;

/// Investor preference fields, used for both saving and inline matching
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct PreferencePayload {
    /// Industries of interest; empty means no constraint
    #[oai(default)]
    pub industries: Vec<String>,

    /// Acceptable development stages; empty means no constraint
    #[oai(default)]
    pub stages: Vec<IdeaStage>,

    /// Regions of interest; empty means no constraint
    #[oai(default)]
    pub regions: Vec<String>,

    /// Lower bound of the funding range, whole currency units
    pub funding_min: i64,

    /// Upper bound of the funding range, whole currency units
    pub funding_max: i64,

    /// Appetite for early-stage risk
    pub risk_tolerance: RiskTolerance,

    /// Expected horizon to a return
    pub timeline: InvestmentTimeline,
}

impl From<PreferencePayload> for MatchPreferences {
    fn from(payload: PreferencePayload) -> Self {
        MatchPreferences {
            industries: payload.industries,
            stages: payload.stages,
            regions: payload.regions,
            funding_min: payload.funding_min,
            funding_max: payload.funding_max,
            risk_tolerance: payload.risk_tolerance,
            timeline: payload.timeline,
        }
    }
}

/// Response model for saved preferences
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub industries: Vec<String>,

    /// Stage wire strings
    pub stages: Vec<String>,

    pub regions: Vec<String>,

    pub funding_min: i64,

    pub funding_max: i64,

    /// Risk tolerance wire string
    pub risk_tolerance: String,

    /// Timeline wire string
    pub timeline: String,

    /// Last save time (Unix timestamp, seconds)
    pub updated_at: i64,
}

impl From<crate::types::db::investor_preference::Model> for PreferenceResponse {
    fn from(model: crate::types::db::investor_preference::Model) -> Self {
        PreferenceResponse {
            industries: decode_string_list(&model.industries),
            stages: decode_string_list(&model.stages),
            regions: decode_string_list(&model.regions),
            funding_min: model.funding_min,
            funding_max: model.funding_max,
            risk_tolerance: model.risk_tolerance,
            timeline: model.timeline,
            updated_at: model.updated_at,
        }
    }
}

/// Request model for a matching run
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FindMatchesRequest {
    /// Inline preferences; falls back to the saved set when omitted
    pub preferences: Option<PreferencePayload>,

    /// Maximum results to return (default 10, capped at 100)
    pub top_k: Option<u32>,

    /// Minimum composite score to include, within [0, 1] (default 0)
    pub min_score: Option<f64>,
}

/// Per-dimension sub-scores behind one composite score
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MatchBreakdownResponse {
    pub industry: f64,
    pub stage: f64,
    pub funding: f64,
    pub geography: f64,
    pub risk_timeline: f64,
}

impl From<ScoreBreakdown> for MatchBreakdownResponse {
    fn from(breakdown: ScoreBreakdown) -> Self {
        MatchBreakdownResponse {
            industry: breakdown.industry,
            stage: breakdown.stage,
            funding: breakdown.funding,
            geography: breakdown.geography,
            risk_timeline: breakdown.risk_timeline,
        }
    }
}

/// One ranked match
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MatchResultItem {
    pub idea: IdeaResponse,

    /// Composite score in [0, 1]
    pub score: f64,

    /// Quality band (perfect, high, promising, exploratory)
    pub band: String,

    pub breakdown: MatchBreakdownResponse,
}

impl From<MatchedIdea> for MatchResultItem {
    fn from(matched: MatchedIdea) -> Self {
        MatchResultItem {
            score: matched.score,
            band: matched.band.as_str().to_string(),
            breakdown: matched.breakdown.into(),
            idea: matched.idea.into(),
        }
    }
}

/// Response model for one matching run
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchResultItem>,

    /// Total candidate ideas considered
    pub pool_size: u64,

    /// Candidates that passed visibility/status eligibility
    pub eligible_count: u64,
}

/// One past matching run
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MatchHistoryEntry {
    pub id: i32,

    /// JSON snapshot of the preferences the run used
    pub preferences: String,

    pub pool_size: i32,

    pub eligible_count: i32,

    pub result_count: i32,

    pub top_score: Option<f64>,

    /// Run time (Unix timestamp, seconds)
    pub created_at: i64,
}

impl From<match_history::Model> for MatchHistoryEntry {
    fn from(model: match_history::Model) -> Self {
        MatchHistoryEntry {
            id: model.id,
            preferences: model.preferences,
            pool_size: model.pool_size,
            eligible_count: model.eligible_count,
            result_count: model.result_count,
            top_score: model.top_score,
            created_at: model.created_at,
        }
    }
}
