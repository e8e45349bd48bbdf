use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::stores::idea_store::decode_string_list;
use crate::types::db::idea;
use crate::types::domain::{IdeaStage, IdeaStatus, IdeaVisibility};

/// Request model for submitting a new idea
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateIdeaRequest {
    /// Idea title
    #[oai(validator(min_length = 1, max_length = 200))]
    pub title: String,

    /// The problem being solved
    #[oai(validator(min_length = 1))]
    pub problem: String,

    /// The proposed solution
    #[oai(validator(min_length = 1))]
    pub solution: String,

    /// Target market description
    pub target_market: Option<String>,

    /// Primary category (e.g. "AI/ML", "fintech")
    #[oai(validator(min_length = 1, max_length = 100))]
    pub category: String,

    /// Industry vertical
    #[oai(validator(min_length = 1, max_length = 100))]
    pub industry: String,

    /// Development stage
    pub stage: IdeaStage,

    /// Visibility; defaults to private
    pub visibility: Option<IdeaVisibility>,

    /// Funding sought, in whole currency units; 0 when unknown
    pub funding_needed: Option<i64>,

    /// Regions the idea targets
    #[oai(default)]
    pub regions: Vec<String>,

    /// Free-form tags
    #[oai(default)]
    pub tags: Vec<String>,
}

/// Request model for updating an idea; omitted fields are left unchanged
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateIdeaRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub title: Option<String>,

    pub problem: Option<String>,

    pub solution: Option<String>,

    pub target_market: Option<String>,

    #[oai(validator(min_length = 1, max_length = 100))]
    pub category: Option<String>,

    #[oai(validator(min_length = 1, max_length = 100))]
    pub industry: Option<String>,

    pub stage: Option<IdeaStage>,

    pub visibility: Option<IdeaVisibility>,

    /// Set to `archived` to retire the idea from listings
    pub status: Option<IdeaStatus>,

    pub funding_needed: Option<i64>,

    pub regions: Option<Vec<String>>,

    pub tags: Option<Vec<String>>,
}

/// Response model representing one idea
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct IdeaResponse {
    /// Idea ID (UUID)
    pub id: String,

    /// Owning user's ID
    pub owner_id: String,

    pub title: String,

    pub problem: String,

    pub solution: String,

    pub target_market: Option<String>,

    pub category: String,

    pub industry: String,

    /// Development stage wire string
    pub stage: String,

    /// Visibility wire string
    pub visibility: String,

    /// Status wire string
    pub status: String,

    pub funding_needed: i64,

    pub regions: Vec<String>,

    pub tags: Vec<String>,

    /// AI assessment score (0-10), when one has been recorded
    pub ai_score: Option<f64>,

    /// AI assessment feedback, when one has been recorded
    pub ai_feedback: Option<String>,

    /// Creation time (Unix timestamp, seconds)
    pub created_at: i64,

    /// Last update time (Unix timestamp, seconds)
    pub updated_at: i64,
}

impl From<idea::Model> for IdeaResponse {
    fn from(model: idea::Model) -> Self {
        IdeaResponse {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            problem: model.problem,
            solution: model.solution,
            target_market: model.target_market,
            category: model.category,
            industry: model.industry,
            stage: model.stage,
            visibility: model.visibility,
            status: model.status,
            funding_needed: model.funding_needed,
            regions: decode_string_list(&model.regions),
            tags: decode_string_list(&model.tags),
            ai_score: model.ai_score,
            ai_feedback: model.ai_feedback,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request model for assisted idea drafting
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct GenerateIdeaRequest {
    /// What the draft should be about
    #[oai(validator(min_length = 1, max_length = 2000))]
    pub prompt: String,

    /// Sampling temperature override
    pub temperature: Option<f64>,
}

/// Response model for assisted idea drafting
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct GeneratedIdeaResponse {
    /// The drafted text
    pub draft: String,

    /// Which provider produced the draft ("fallback" when generation failed)
    pub source: String,
}

/// Response model for AI idea scoring
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ScoreIdeaResponse {
    /// Parsed 0-10 score; absent when the reply carried no usable number
    pub score: Option<f64>,

    /// Assessment text
    pub feedback: String,

    /// Which provider produced the assessment ("fallback" when generation failed)
    pub source: String,
}
