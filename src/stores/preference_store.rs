use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::errors::StoreError;
use crate::services::matching::MatchPreferences;
use crate::stores::idea_store::encode_string_list;
use crate::types::db::investor_preference::{self, Entity as InvestorPreference};
use crate::types::db::match_history::{self, Entity as MatchHistory};

/// One completed matching run, for the analytics trail.
pub struct NewMatchRecord {
    pub investor_id: String,
    /// JSON snapshot of the preferences the run used
    pub preferences: String,
    pub pool_size: i32,
    pub eligible_count: i32,
    pub result_count: i32,
    pub top_score: Option<f64>,
}

const HISTORY_PAGE_SIZE: u64 = 50;

/// PreferenceStore manages saved investor preferences and the match-history trail
pub struct PreferenceStore {
    db: DatabaseConnection,
}

impl PreferenceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find(
        &self,
        investor_id: &str,
    ) -> Result<Option<investor_preference::Model>, StoreError> {
        InvestorPreference::find_by_id(investor_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::operation("find_preferences", e))
    }

    /// Save an investor's preferences, replacing any previous set
    pub async fn upsert(
        &self,
        investor_id: &str,
        input: &MatchPreferences,
    ) -> Result<investor_preference::Model, StoreError> {
        let stages: Vec<String> = input
            .stages
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        let record = investor_preference::ActiveModel {
            investor_id: Set(investor_id.to_string()),
            industries: Set(encode_string_list(&input.industries)),
            stages: Set(encode_string_list(&stages)),
            regions: Set(encode_string_list(&input.regions)),
            funding_min: Set(input.funding_min),
            funding_max: Set(input.funding_max),
            risk_tolerance: Set(input.risk_tolerance.as_str().to_string()),
            timeline: Set(input.timeline.as_str().to_string()),
            updated_at: Set(Utc::now().timestamp()),
        };

        // One row per investor; the primary key is the investor id.
        if self.find(investor_id).await?.is_some() {
            record
                .update(&self.db)
                .await
                .map_err(|e| StoreError::operation("update_preferences", e))
        } else {
            record
                .insert(&self.db)
                .await
                .map_err(|e| StoreError::operation("insert_preferences", e))
        }
    }

    /// Append one matching run to the history trail
    pub async fn record_history(&self, entry: NewMatchRecord) -> Result<(), StoreError> {
        let record = match_history::ActiveModel {
            id: NotSet,
            investor_id: Set(entry.investor_id),
            preferences: Set(entry.preferences),
            pool_size: Set(entry.pool_size),
            eligible_count: Set(entry.eligible_count),
            result_count: Set(entry.result_count),
            top_score: Set(entry.top_score),
            created_at: Set(Utc::now().timestamp()),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::operation("record_match_history", e))?;

        Ok(())
    }

    /// Recent matching runs for one investor, newest first
    pub async fn list_history(
        &self,
        investor_id: &str,
    ) -> Result<Vec<match_history::Model>, StoreError> {
        MatchHistory::find()
            .filter(match_history::Column::InvestorId.eq(investor_id))
            .order_by_desc(match_history::Column::Id)
            .limit(HISTORY_PAGE_SIZE)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::operation("list_match_history", e))
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("db", &"<connection>")
            .finish()
    }
}
