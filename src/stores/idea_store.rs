use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::types::db::idea::{self, Entity as Idea};
use crate::types::domain::{IdeaStage, IdeaStatus, IdeaVisibility};

/// Fields collected when an idea is first submitted.
pub struct NewIdea {
    pub owner_id: String,
    pub title: String,
    pub problem: String,
    pub solution: String,
    pub target_market: Option<String>,
    pub category: String,
    pub industry: String,
    pub stage: IdeaStage,
    pub visibility: IdeaVisibility,
    pub status: IdeaStatus,
    pub funding_needed: i64,
    pub regions: Vec<String>,
    pub tags: Vec<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Default)]
pub struct IdeaUpdate {
    pub title: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub target_market: Option<String>,
    pub category: Option<String>,
    pub industry: Option<String>,
    pub stage: Option<IdeaStage>,
    pub visibility: Option<IdeaVisibility>,
    pub status: Option<IdeaStatus>,
    pub funding_needed: Option<i64>,
    pub regions: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Encode a string list for a text column.
pub fn encode_string_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a text column holding a JSON string list. Lenient: malformed
/// content reads as empty rather than failing the whole row.
pub fn decode_string_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// IdeaStore manages idea records and their listings
pub struct IdeaStore {
    db: DatabaseConnection,
}

impl IdeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_idea: NewIdea) -> Result<idea::Model, StoreError> {
        let now = Utc::now().timestamp();

        let record = idea::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            owner_id: Set(new_idea.owner_id),
            title: Set(new_idea.title),
            problem: Set(new_idea.problem),
            solution: Set(new_idea.solution),
            target_market: Set(new_idea.target_market),
            category: Set(new_idea.category),
            industry: Set(new_idea.industry),
            stage: Set(new_idea.stage.as_str().to_string()),
            visibility: Set(new_idea.visibility.as_str().to_string()),
            status: Set(new_idea.status.as_str().to_string()),
            funding_needed: Set(new_idea.funding_needed),
            regions: Set(encode_string_list(&new_idea.regions)),
            tags: Set(encode_string_list(&new_idea.tags)),
            ai_score: Set(None),
            ai_feedback: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::operation("create_idea", e))
    }

    pub async fn find_by_id(&self, idea_id: &str) -> Result<Option<idea::Model>, StoreError> {
        Idea::find_by_id(idea_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::operation("find_idea_by_id", e))
    }

    /// List publicly discoverable ideas, newest first
    ///
    /// Eligible means `visibility ∈ {public, public_ideas}` and not archived.
    pub async fn list_public(
        &self,
        category: Option<&str>,
        stage: Option<IdeaStage>,
    ) -> Result<Vec<idea::Model>, StoreError> {
        let mut query = Idea::find()
            .filter(idea::Column::Visibility.is_in([
                IdeaVisibility::Public.as_str(),
                IdeaVisibility::PublicIdeas.as_str(),
            ]))
            .filter(idea::Column::Status.ne(IdeaStatus::Archived.as_str()))
            .order_by_desc(idea::Column::CreatedAt);

        if let Some(category) = category {
            query = query.filter(idea::Column::Category.eq(category));
        }
        if let Some(stage) = stage {
            query = query.filter(idea::Column::Stage.eq(stage.as_str()));
        }

        query
            .all(&self.db)
            .await
            .map_err(|e| StoreError::operation("list_public_ideas", e))
    }

    /// List every idea owned by one account, newest first
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<idea::Model>, StoreError> {
        Idea::find()
            .filter(idea::Column::OwnerId.eq(owner_id))
            .order_by_desc(idea::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::operation("list_ideas_by_owner", e))
    }

    /// The full candidate pool for the matching engine
    ///
    /// Deliberately unfiltered: the engine reports pool size and eligible
    /// count separately, so eligibility is its call.
    pub async fn list_all(&self) -> Result<Vec<idea::Model>, StoreError> {
        Idea::find()
            .all(&self.db)
            .await
            .map_err(|e| StoreError::operation("list_all_ideas", e))
    }

    pub async fn update(
        &self,
        idea_id: &str,
        changes: IdeaUpdate,
    ) -> Result<idea::Model, StoreError> {
        let found = self
            .find_by_id(idea_id)
            .await?
            .ok_or(StoreError::NotFound { entity: "Idea" })?;

        let mut record = found.into_active_model();
        if let Some(title) = changes.title {
            record.title = Set(title);
        }
        if let Some(problem) = changes.problem {
            record.problem = Set(problem);
        }
        if let Some(solution) = changes.solution {
            record.solution = Set(solution);
        }
        if let Some(target_market) = changes.target_market {
            record.target_market = Set(Some(target_market));
        }
        if let Some(category) = changes.category {
            record.category = Set(category);
        }
        if let Some(industry) = changes.industry {
            record.industry = Set(industry);
        }
        if let Some(stage) = changes.stage {
            record.stage = Set(stage.as_str().to_string());
        }
        if let Some(visibility) = changes.visibility {
            record.visibility = Set(visibility.as_str().to_string());
        }
        if let Some(status) = changes.status {
            record.status = Set(status.as_str().to_string());
        }
        if let Some(funding_needed) = changes.funding_needed {
            record.funding_needed = Set(funding_needed);
        }
        if let Some(regions) = changes.regions {
            record.regions = Set(encode_string_list(&regions));
        }
        if let Some(tags) = changes.tags {
            record.tags = Set(encode_string_list(&tags));
        }
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| StoreError::operation("update_idea", e))
    }

    /// Attach an AI assessment produced by the scoring endpoint
    ///
    /// `score` is `None` when the model reply carried feedback but no
    /// parseable number; the previous score is left untouched in that case.
    pub async fn record_assessment(
        &self,
        idea_id: &str,
        score: Option<f64>,
        feedback: String,
    ) -> Result<idea::Model, StoreError> {
        let found = self
            .find_by_id(idea_id)
            .await?
            .ok_or(StoreError::NotFound { entity: "Idea" })?;

        let mut record = found.into_active_model();
        if let Some(score) = score {
            record.ai_score = Set(Some(score));
        }
        record.ai_feedback = Set(Some(feedback));
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| StoreError::operation("record_assessment", e))
    }
}

impl std::fmt::Debug for IdeaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdeaStore")
            .field("db", &"<connection>")
            .finish()
    }
}
