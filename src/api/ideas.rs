use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::assist::{extract_score, GenerationOptions};
use crate::services::guard::{authorize, AccessPolicy, AuthorizationGuard};
use crate::services::{AssistClient, TokenGuard};
use crate::stores::idea_store::{IdeaUpdate, NewIdea};
use crate::stores::IdeaStore;
use crate::types::db::idea;
use crate::types::domain::{IdeaStage, IdeaStatus, IdeaVisibility, Role};
use crate::types::dto::ideas::{
    CreateIdeaRequest, GenerateIdeaRequest, GeneratedIdeaResponse, IdeaResponse, ScoreIdeaResponse,
    UpdateIdeaRequest,
};
use crate::types::internal::auth::VerifiedIdentity;

/// Roles allowed to submit and draft ideas.
const SUBMITTER_ROLES: &[Role] = &[Role::Innovator, Role::Hub];

/// Reply source reported when generation failed and a template stood in.
const FALLBACK_SOURCE: &str = "fallback";

/// Idea submission, listing, and AI-assist API endpoints
pub struct IdeasApi {
    ideas: Arc<IdeaStore>,
    tokens: Arc<TokenGuard>,
    guard: Arc<AuthorizationGuard>,
    assist: AssistClient,
}

impl IdeasApi {
    /// Create a new IdeasApi with the given stores, guards, and assist client
    pub fn new(
        ideas: Arc<IdeaStore>,
        tokens: Arc<TokenGuard>,
        guard: Arc<AuthorizationGuard>,
        assist: AssistClient,
    ) -> Self {
        Self {
            ideas,
            tokens,
            guard,
            assist,
        }
    }

    /// Verify the token and apply the account-level gate
    async fn authenticated(&self, token: &str) -> Result<VerifiedIdentity, ApiError> {
        let identity = self.tokens.verify(token).await?;
        self.guard.ensure_account_allowed(&identity).await?;
        Ok(identity)
    }

    /// Load an idea the caller is allowed to read
    ///
    /// Owners and admins always see their records. Everyone else only sees
    /// discoverable visibilities; private records answer 404 so their
    /// existence is not leaked. Unknown stored visibility fails closed.
    async fn readable_idea(
        &self,
        identity: &VerifiedIdentity,
        idea_id: &str,
    ) -> Result<idea::Model, ApiError> {
        let Some(found) = self.ideas.find_by_id(idea_id).await? else {
            return Err(ApiError::not_found("Idea"));
        };

        if identity.is_admin() || identity.subject == found.owner_id {
            return Ok(found);
        }

        let discoverable = IdeaVisibility::parse(&found.visibility)
            .map(|v| v.is_discoverable())
            .unwrap_or(false);
        if !discoverable {
            return Err(ApiError::not_found("Idea"));
        }

        Ok(found)
    }

    /// Load an idea and require owner-or-admin access
    async fn owned_idea(
        &self,
        identity: &VerifiedIdentity,
        idea_id: &str,
    ) -> Result<idea::Model, ApiError> {
        let Some(found) = self.ideas.find_by_id(idea_id).await? else {
            return Err(ApiError::not_found("Idea"));
        };
        authorize(identity, &AccessPolicy::Owner(&found.owner_id))?;
        Ok(found)
    }

    fn elaboration_prompt(topic: &str) -> String {
        format!(
            "You are helping a startup founder flesh out an idea.\n\
             Draft a concise startup idea for: {topic}\n\n\
             Cover, in order: the problem, the proposed solution, the target \
             market, and a suggested first milestone. Keep it under 250 words."
        )
    }

    fn fallback_draft(topic: &str) -> String {
        format!(
            "Draft outline for \"{topic}\":\n\n\
             Problem: describe the specific pain this idea removes.\n\
             Solution: sketch how the product removes it.\n\
             Target market: name who feels the pain most and how you reach them.\n\
             First milestone: the smallest demo that proves it works."
        )
    }

    fn scoring_prompt(found: &idea::Model) -> String {
        format!(
            "Assess the following startup idea. Reply with a line \"Score: N\" \
             where N is between 0 and 10, followed by two or three sentences of \
             feedback.\n\n\
             Title: {}\nProblem: {}\nSolution: {}\nCategory: {}\nIndustry: {}\nStage: {}",
            found.title, found.problem, found.solution, found.category, found.industry, found.stage
        )
    }
}

/// API tags for idea endpoints
#[derive(Tags)]
enum IdeaTags {
    /// Idea submission and listing endpoints
    Ideas,
}

#[OpenApi(prefix_path = "/ideas")]
impl IdeasApi {
    /// Submit a new idea
    ///
    /// Innovator and hub accounts only. Visibility defaults to private and
    /// status to active.
    #[oai(path = "/", method = "post", tag = "IdeaTags::Ideas")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateIdeaRequest>,
    ) -> Result<Json<IdeaResponse>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;
        authorize(&identity, &AccessPolicy::Roles(SUBMITTER_ROLES))?;

        let body = body.0;
        let created = self
            .ideas
            .create(NewIdea {
                owner_id: identity.subject,
                title: body.title,
                problem: body.problem,
                solution: body.solution,
                target_market: body.target_market,
                category: body.category,
                industry: body.industry,
                stage: body.stage,
                visibility: body.visibility.unwrap_or(IdeaVisibility::Private),
                status: IdeaStatus::Active,
                funding_needed: body.funding_needed.unwrap_or(0),
                regions: body.regions,
                tags: body.tags,
            })
            .await?;

        Ok(Json(IdeaResponse::from(created)))
    }

    /// List publicly discoverable ideas
    ///
    /// Archived records never appear. Optional exact-match filters on
    /// category and stage.
    #[oai(path = "/", method = "get", tag = "IdeaTags::Ideas")]
    async fn list(
        &self,
        auth: BearerAuth,
        category: Query<Option<String>>,
        stage: Query<Option<IdeaStage>>,
    ) -> Result<Json<Vec<IdeaResponse>>, ApiError> {
        self.authenticated(&auth.0.token).await?;

        let found = self.ideas.list_public(category.0.as_deref(), stage.0).await?;
        Ok(Json(found.into_iter().map(IdeaResponse::from).collect()))
    }

    /// List the caller's own ideas, whatever their visibility
    #[oai(path = "/mine", method = "get", tag = "IdeaTags::Ideas")]
    async fn mine(&self, auth: BearerAuth) -> Result<Json<Vec<IdeaResponse>>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;

        let found = self.ideas.list_by_owner(&identity.subject).await?;
        Ok(Json(found.into_iter().map(IdeaResponse::from).collect()))
    }

    /// Draft an idea outline with the generative assist
    ///
    /// Generation failure is not a request failure: the endpoint answers
    /// with templated fallback text and `source` set to `fallback`.
    #[oai(path = "/generate", method = "post", tag = "IdeaTags::Ideas")]
    async fn generate(
        &self,
        auth: BearerAuth,
        body: Json<GenerateIdeaRequest>,
    ) -> Result<Json<GeneratedIdeaResponse>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;
        authorize(&identity, &AccessPolicy::Roles(SUBMITTER_ROLES))?;

        let options = GenerationOptions {
            temperature: body.0.temperature,
            ..GenerationOptions::default()
        };

        match self
            .assist
            .generate(&Self::elaboration_prompt(&body.0.prompt), &options)
            .await
        {
            Ok(draft) => Ok(Json(GeneratedIdeaResponse {
                draft,
                source: self.assist.provider_name().to_string(),
            })),
            Err(e) => {
                tracing::warn!(error = %e, "idea generation failed; serving fallback draft");
                Ok(Json(GeneratedIdeaResponse {
                    draft: Self::fallback_draft(&body.0.prompt),
                    source: FALLBACK_SOURCE.to_string(),
                }))
            }
        }
    }

    /// Fetch one idea
    #[oai(path = "/:id", method = "get", tag = "IdeaTags::Ideas")]
    async fn get(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<IdeaResponse>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;
        let found = self.readable_idea(&identity, &id.0).await?;
        Ok(Json(IdeaResponse::from(found)))
    }

    /// Update an idea
    ///
    /// Owner or admin. Omitted fields are left unchanged; set status to
    /// `archived` to retire the idea from listings and matching.
    #[oai(path = "/:id", method = "put", tag = "IdeaTags::Ideas")]
    async fn update(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateIdeaRequest>,
    ) -> Result<Json<IdeaResponse>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;
        self.owned_idea(&identity, &id.0).await?;

        let body = body.0;
        let updated = self
            .ideas
            .update(
                &id.0,
                IdeaUpdate {
                    title: body.title,
                    problem: body.problem,
                    solution: body.solution,
                    target_market: body.target_market,
                    category: body.category,
                    industry: body.industry,
                    stage: body.stage,
                    visibility: body.visibility,
                    status: body.status,
                    funding_needed: body.funding_needed,
                    regions: body.regions,
                    tags: body.tags,
                },
            )
            .await?;

        Ok(Json(IdeaResponse::from(updated)))
    }

    /// Score an idea with the generative assist
    ///
    /// Owner or admin. A parseable number in the reply is stored as the
    /// idea's score; a reply without one stores feedback only and keeps any
    /// previous score. Generation failure answers with fallback feedback and
    /// stores nothing.
    #[oai(path = "/:id/score", method = "post", tag = "IdeaTags::Ideas")]
    async fn score(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<ScoreIdeaResponse>, ApiError> {
        let identity = self.authenticated(&auth.0.token).await?;
        let found = self.owned_idea(&identity, &id.0).await?;

        let reply = match self
            .assist
            .generate(&Self::scoring_prompt(&found), &GenerationOptions::default())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(idea_id = %found.id, error = %e, "idea scoring failed; serving fallback feedback");
                return Ok(Json(ScoreIdeaResponse {
                    score: None,
                    feedback: "Automated scoring is temporarily unavailable; the idea was left unchanged. Try again later.".to_string(),
                    source: FALLBACK_SOURCE.to_string(),
                }));
            }
        };

        let score = extract_score(&reply);
        let feedback = reply.trim().to_string();
        self.ideas
            .record_assessment(&found.id, score, feedback.clone())
            .await?;

        Ok(Json(ScoreIdeaResponse {
            score,
            feedback,
            source: self.assist.provider_name().to_string(),
        }))
    }
}
