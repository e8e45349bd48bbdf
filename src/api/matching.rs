use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::guard::{authorize, AccessPolicy, AuthorizationGuard};
use crate::services::matching::{find_matches, MatchPreferences, MatchWeights};
use crate::services::TokenGuard;
use crate::stores::preference_store::NewMatchRecord;
use crate::stores::{IdeaStore, PreferenceStore};
use crate::types::domain::Role;
use crate::types::dto::matching::{
    FindMatchesRequest, FindMatchesResponse, MatchHistoryEntry, MatchResultItem,
    PreferencePayload, PreferenceResponse,
};
use crate::types::internal::auth::VerifiedIdentity;

/// Result count when the request does not name one.
const DEFAULT_TOP_K: usize = 10;
/// Score floor when the request does not name one.
const DEFAULT_MIN_SCORE: f64 = 0.0;

/// Investor preference and matching API endpoints
pub struct MatchingApi {
    preferences: Arc<PreferenceStore>,
    ideas: Arc<IdeaStore>,
    tokens: Arc<TokenGuard>,
    guard: Arc<AuthorizationGuard>,
    weights: MatchWeights,
}

impl MatchingApi {
    /// Create a new MatchingApi with the given stores, guards, and weights
    pub fn new(
        preferences: Arc<PreferenceStore>,
        ideas: Arc<IdeaStore>,
        tokens: Arc<TokenGuard>,
        guard: Arc<AuthorizationGuard>,
        weights: MatchWeights,
    ) -> Self {
        Self {
            preferences,
            ideas,
            tokens,
            guard,
            weights,
        }
    }

    /// Verify the token, apply the account gate, and require the investor role
    async fn investor(&self, token: &str) -> Result<VerifiedIdentity, ApiError> {
        let identity = self.tokens.verify(token).await?;
        self.guard.ensure_account_allowed(&identity).await?;
        authorize(&identity, &AccessPolicy::Roles(&[Role::Investor]))?;
        Ok(identity)
    }
}

/// API tags for matching endpoints
#[derive(Tags)]
enum MatchingTags {
    /// Investor preference and matching endpoints
    Matching,
}

#[OpenApi(prefix_path = "/matching")]
impl MatchingApi {
    /// Fetch the caller's saved matching preferences
    #[oai(path = "/preferences", method = "get", tag = "MatchingTags::Matching")]
    async fn get_preferences(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<PreferenceResponse>, ApiError> {
        let identity = self.investor(&auth.0.token).await?;

        let Some(found) = self.preferences.find(&identity.subject).await? else {
            return Err(ApiError::not_found("Preferences"));
        };
        Ok(Json(PreferenceResponse::from(found)))
    }

    /// Save the caller's matching preferences
    ///
    /// One row per investor; saving again replaces the previous set.
    #[oai(path = "/preferences", method = "put", tag = "MatchingTags::Matching")]
    async fn put_preferences(
        &self,
        auth: BearerAuth,
        body: Json<PreferencePayload>,
    ) -> Result<Json<PreferenceResponse>, ApiError> {
        let identity = self.investor(&auth.0.token).await?;

        let body = body.0;
        // Reject inverted bounds at save time, before they poison later finds
        if body.funding_min > body.funding_max {
            return Err(ApiError::invalid_argument(
                "funding_min must not exceed funding_max",
            ));
        }

        let input = MatchPreferences::from(body);
        let saved = self.preferences.upsert(&identity.subject, &input).await?;
        Ok(Json(PreferenceResponse::from(saved)))
    }

    /// Run the matching engine for the caller
    ///
    /// Preferences come inline or, when omitted, from the caller's saved
    /// row. A summary row lands in the match history; a history write
    /// failure is logged, never surfaced.
    #[oai(path = "/find", method = "post", tag = "MatchingTags::Matching")]
    async fn find(
        &self,
        auth: BearerAuth,
        body: Json<FindMatchesRequest>,
    ) -> Result<Json<FindMatchesResponse>, ApiError> {
        let identity = self.investor(&auth.0.token).await?;

        let body = body.0;
        let preferences = match body.preferences {
            Some(payload) => MatchPreferences::from(payload),
            None => {
                let Some(saved) = self.preferences.find(&identity.subject).await? else {
                    return Err(ApiError::invalid_argument(
                        "No preferences in the request and none saved; supply them inline or save them first",
                    ));
                };
                MatchPreferences::from_saved(&saved)?
            }
        };

        let top_k = body.top_k.map(|k| k as usize).unwrap_or(DEFAULT_TOP_K);
        let min_score = body.min_score.unwrap_or(DEFAULT_MIN_SCORE);

        let pool = self.ideas.list_all().await?;
        let outcome = find_matches(&preferences, &pool, top_k, min_score, &self.weights)?;

        let snapshot =
            serde_json::to_string(&preferences).unwrap_or_else(|_| "{}".to_string());
        let history = NewMatchRecord {
            investor_id: identity.subject.clone(),
            preferences: snapshot,
            pool_size: outcome.pool_size as i32,
            eligible_count: outcome.eligible_count as i32,
            result_count: outcome.matches.len() as i32,
            top_score: outcome.matches.first().map(|m| m.score),
        };
        if let Err(e) = self.preferences.record_history(history).await {
            tracing::error!(investor_id = %identity.subject, error = %e, "failed to record match history");
        }

        Ok(Json(FindMatchesResponse {
            matches: outcome
                .matches
                .into_iter()
                .map(MatchResultItem::from)
                .collect(),
            pool_size: outcome.pool_size as u64,
            eligible_count: outcome.eligible_count as u64,
        }))
    }

    /// List the caller's recent match runs, newest first
    #[oai(path = "/history", method = "get", tag = "MatchingTags::Matching")]
    async fn history(&self, auth: BearerAuth) -> Result<Json<Vec<MatchHistoryEntry>>, ApiError> {
        let identity = self.investor(&auth.0.token).await?;

        let rows = self.preferences.list_history(&identity.subject).await?;
        Ok(Json(rows.into_iter().map(MatchHistoryEntry::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    use crate::services::token_verifier::TokenVerifier;
    use crate::services::TokenService;
    use crate::stores::idea_store::NewIdea;
    use crate::stores::user_store::NewUser;
    use crate::stores::UserStore;
    use crate::types::domain::{
        IdeaStage, IdeaStatus, IdeaVisibility, InvestmentTimeline, RiskTolerance,
    };

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    struct TestHarness {
        api: MatchingApi,
        users: Arc<UserStore>,
        ideas: Arc<IdeaStore>,
        token_service: Arc<TokenService>,
    }

    async fn setup() -> TestHarness {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let users = Arc::new(UserStore::new(
            db.clone(),
            "test-pepper-for-api-tests".to_string(),
        ));
        let token_service = Arc::new(TokenService::new(TEST_SECRET.to_string(), 60));
        let tokens = Arc::new(TokenGuard::new(vec![
            token_service.clone() as Arc<dyn TokenVerifier>
        ]));
        let guard = Arc::new(AuthorizationGuard::new(users.clone()));
        let ideas = Arc::new(IdeaStore::new(db.clone()));
        let preferences = Arc::new(PreferenceStore::new(db));

        TestHarness {
            api: MatchingApi::new(
                preferences,
                ideas.clone(),
                tokens,
                guard,
                MatchWeights::default(),
            ),
            users,
            ideas,
            token_service,
        }
    }

    async fn approved_account(harness: &TestHarness, email: &str, role: Role) -> (String, String) {
        let created = harness
            .users
            .register(NewUser {
                email: email.to_string(),
                display_name: "Test Account".to_string(),
                role,
                password: "s3cure-pass".to_string(),
            })
            .await
            .expect("Failed to register account");
        harness
            .users
            .approve(&created.id)
            .await
            .expect("Failed to approve account");

        let token = harness
            .token_service
            .issue(&created.id, role, vec!["api".to_string()])
            .expect("Failed to issue token");
        (created.id, token)
    }

    fn bearer(token: &str) -> BearerAuth {
        BearerAuth(Bearer {
            token: token.to_string(),
        })
    }

    async fn seed_eligible_idea(harness: &TestHarness, owner_id: &str) {
        harness
            .ideas
            .create(NewIdea {
                owner_id: owner_id.to_string(),
                title: "AI workflow automation".to_string(),
                problem: "Manual processes burn hours".to_string(),
                solution: "Automate the workflow end to end".to_string(),
                target_market: Some("Operations teams".to_string()),
                category: "AI/ML".to_string(),
                industry: "software".to_string(),
                stage: IdeaStage::Seed,
                visibility: IdeaVisibility::Public,
                status: IdeaStatus::Active,
                funding_needed: 50_000,
                regions: vec!["NA".to_string()],
                tags: vec![],
            })
            .await
            .expect("Failed to seed idea");
    }

    fn scenario_payload() -> PreferencePayload {
        PreferencePayload {
            industries: vec!["AI/ML".to_string()],
            stages: vec![IdeaStage::Seed],
            regions: vec!["NA".to_string()],
            funding_min: 10_000,
            funding_max: 1_000_000,
            risk_tolerance: RiskTolerance::Medium,
            timeline: InvestmentTimeline::SixMonths,
        }
    }

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let harness = setup().await;
        let (_, token) = approved_account(&harness, "inv@example.com", Role::Investor).await;

        let saved = harness
            .api
            .put_preferences(bearer(&token), Json(scenario_payload()))
            .await
            .expect("save should succeed")
            .0;
        assert_eq!(saved.risk_tolerance, "medium");
        assert_eq!(saved.timeline, "6_months");
        assert_eq!(saved.stages, vec!["seed".to_string()]);

        let fetched = harness
            .api
            .get_preferences(bearer(&token))
            .await
            .expect("fetch should succeed")
            .0;
        assert_eq!(fetched.funding_min, 10_000);
        assert_eq!(fetched.funding_max, 1_000_000);
    }

    #[tokio::test]
    async fn test_get_preferences_before_saving_is_not_found() {
        let harness = setup().await;
        let (_, token) = approved_account(&harness, "fresh@example.com", Role::Investor).await;

        let err = harness
            .api
            .get_preferences(bearer(&token))
            .await
            .expect_err("nothing saved yet");
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_put_preferences_rejects_inverted_funding_bounds() {
        let harness = setup().await;
        let (_, token) = approved_account(&harness, "bounds@example.com", Role::Investor).await;

        let mut payload = scenario_payload();
        payload.funding_min = 500_000;
        payload.funding_max = 10_000;

        let err = harness
            .api
            .put_preferences(bearer(&token), Json(payload))
            .await
            .expect_err("inverted bounds must fail");
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[tokio::test]
    async fn test_find_with_inline_preferences_matches_the_seeded_idea() {
        let harness = setup().await;
        let (owner_id, _) =
            approved_account(&harness, "founder@example.com", Role::Innovator).await;
        let (_, token) = approved_account(&harness, "match@example.com", Role::Investor).await;
        seed_eligible_idea(&harness, &owner_id).await;

        let response = harness
            .api
            .find(
                bearer(&token),
                Json(FindMatchesRequest {
                    preferences: Some(scenario_payload()),
                    top_k: None,
                    min_score: Some(0.1),
                }),
            )
            .await
            .expect("find should succeed")
            .0;

        assert_eq!(response.pool_size, 1);
        assert_eq!(response.eligible_count, 1);
        assert_eq!(response.matches.len(), 1);

        let hit = &response.matches[0];
        assert_eq!(hit.idea.title, "AI workflow automation");
        assert!(hit.score > 0.1);
        assert!((hit.score - 0.975).abs() < 1e-9);
        assert_eq!(hit.band, "perfect");
    }

    #[tokio::test]
    async fn test_find_without_saved_or_inline_preferences_fails() {
        let harness = setup().await;
        let (_, token) = approved_account(&harness, "bare@example.com", Role::Investor).await;

        let err = harness
            .api
            .find(
                bearer(&token),
                Json(FindMatchesRequest {
                    preferences: None,
                    top_k: None,
                    min_score: None,
                }),
            )
            .await
            .expect_err("no preferences anywhere must fail");
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[tokio::test]
    async fn test_find_falls_back_to_saved_preferences() {
        let harness = setup().await;
        let (owner_id, _) = approved_account(&harness, "owner@example.com", Role::Innovator).await;
        let (_, token) = approved_account(&harness, "saved@example.com", Role::Investor).await;
        seed_eligible_idea(&harness, &owner_id).await;

        harness
            .api
            .put_preferences(bearer(&token), Json(scenario_payload()))
            .await
            .expect("save should succeed");

        let response = harness
            .api
            .find(
                bearer(&token),
                Json(FindMatchesRequest {
                    preferences: None,
                    top_k: None,
                    min_score: None,
                }),
            )
            .await
            .expect("find should use the saved row")
            .0;

        assert_eq!(response.matches.len(), 1);
    }

    #[tokio::test]
    async fn test_find_is_investor_only() {
        let harness = setup().await;
        let (_, token) = approved_account(&harness, "maker@example.com", Role::Innovator).await;

        let err = harness
            .api
            .find(
                bearer(&token),
                Json(FindMatchesRequest {
                    preferences: Some(scenario_payload()),
                    top_k: None,
                    min_score: None,
                }),
            )
            .await
            .expect_err("innovator must not run matching");
        assert_eq!(err.kind(), "forbidden");
    }

    #[tokio::test]
    async fn test_find_rejects_oversized_top_k() {
        let harness = setup().await;
        let (_, token) = approved_account(&harness, "greedy@example.com", Role::Investor).await;

        let err = harness
            .api
            .find(
                bearer(&token),
                Json(FindMatchesRequest {
                    preferences: Some(scenario_payload()),
                    top_k: Some(101),
                    min_score: None,
                }),
            )
            .await
            .expect_err("top_k over the cap must fail");
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[tokio::test]
    async fn test_find_records_a_history_row() {
        let harness = setup().await;
        let (owner_id, _) = approved_account(&harness, "own2@example.com", Role::Innovator).await;
        let (_, token) = approved_account(&harness, "trail@example.com", Role::Investor).await;
        seed_eligible_idea(&harness, &owner_id).await;

        harness
            .api
            .find(
                bearer(&token),
                Json(FindMatchesRequest {
                    preferences: Some(scenario_payload()),
                    top_k: None,
                    min_score: Some(0.1),
                }),
            )
            .await
            .expect("find should succeed");

        let history = harness
            .api
            .history(bearer(&token))
            .await
            .expect("history should succeed")
            .0;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].pool_size, 1);
        assert_eq!(history[0].eligible_count, 1);
        assert_eq!(history[0].result_count, 1);
        let top = history[0].top_score.expect("one match implies a top score");
        assert!((top - 0.975).abs() < 1e-9);
        assert!(history[0].preferences.contains("AI/ML"));
    }
}
