use std::cmp::Ordering;
use std::collections::HashSet;

use crate::errors::MatchError;
use crate::stores::idea_store::decode_string_list;
use crate::types::db::idea;
use crate::types::domain::{
    IdeaStage, IdeaStatus, IdeaVisibility, InvestmentTimeline, RiskTolerance,
};

use super::{MatchPreferences, MatchWeights};

/// Hard ceiling on requested result-set size.
pub const MAX_TOP_K: usize = 100;

/// Post-hoc quality band, for summary reporting only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBand {
    Perfect,
    High,
    Promising,
    Exploratory,
}

impl MatchBand {
    pub fn classify(score: f64) -> Self {
        if score >= 0.9 {
            MatchBand::Perfect
        } else if score >= 0.7 {
            MatchBand::High
        } else if score >= 0.5 {
            MatchBand::Promising
        } else {
            MatchBand::Exploratory
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchBand::Perfect => "perfect",
            MatchBand::High => "high",
            MatchBand::Promising => "promising",
            MatchBand::Exploratory => "exploratory",
        }
    }
}

/// Per-dimension sub-scores, each in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub industry: f64,
    pub stage: f64,
    pub funding: f64,
    pub geography: f64,
    pub risk_timeline: f64,
}

impl ScoreBreakdown {
    pub fn composite(&self, weights: &MatchWeights) -> f64 {
        self.industry * weights.industry
            + self.stage * weights.stage
            + self.funding * weights.funding
            + self.geography * weights.geography
            + self.risk_timeline * weights.risk_timeline
    }
}

/// One ranked result
#[derive(Debug, Clone)]
pub struct MatchedIdea {
    pub idea: idea::Model,
    pub score: f64,
    pub band: MatchBand,
    pub breakdown: ScoreBreakdown,
}

/// The full outcome of one matching run
///
/// `pool_size` and `eligible_count` make "no candidates at all" and
/// "candidates but none eligible" observably different.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matches: Vec<MatchedIdea>,
    pub pool_size: usize,
    pub eligible_count: usize,
}

/// Score a candidate pool against one set of preferences
///
/// Returns at most `top_k` results, every score ≥ `min_score`, sorted by
/// score descending with ties broken by most recent creation.
pub fn find_matches(
    preferences: &MatchPreferences,
    pool: &[idea::Model],
    top_k: usize,
    min_score: f64,
    weights: &MatchWeights,
) -> Result<MatchOutcome, MatchError> {
    if !(0.0..=1.0).contains(&min_score) {
        return Err(MatchError::MinScoreOutOfRange(min_score));
    }
    if preferences.funding_min > preferences.funding_max {
        return Err(MatchError::FundingRangeInverted {
            min: preferences.funding_min,
            max: preferences.funding_max,
        });
    }
    if top_k > MAX_TOP_K {
        return Err(MatchError::TopKTooLarge {
            got: top_k,
            max: MAX_TOP_K,
        });
    }

    let pool_size = pool.len();
    let eligible: Vec<&idea::Model> = pool.iter().filter(|idea| is_eligible(idea)).collect();
    let eligible_count = eligible.len();

    if pool_size == 0 {
        tracing::debug!("matching ran against an empty candidate pool");
    } else if eligible_count == 0 {
        tracing::warn!(
            pool_size,
            "candidate pool has no eligible ideas; check stored visibility/status values"
        );
    }

    let mut matches: Vec<MatchedIdea> = eligible
        .into_iter()
        .filter_map(|idea| {
            let breakdown = score_idea(preferences, idea);
            let score = breakdown.composite(weights);
            if score >= min_score {
                Some(MatchedIdea {
                    idea: idea.clone(),
                    score,
                    band: MatchBand::classify(score),
                    breakdown,
                })
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.idea.created_at.cmp(&a.idea.created_at))
    });
    matches.truncate(top_k);

    Ok(MatchOutcome {
        matches,
        pool_size,
        eligible_count,
    })
}

/// Eligibility per the visibility/status invariant. Unparseable values fail
/// closed: a record we cannot classify is never surfaced.
fn is_eligible(idea: &idea::Model) -> bool {
    let Some(visibility) = IdeaVisibility::parse(&idea.visibility) else {
        return false;
    };
    let Some(status) = IdeaStatus::parse(&idea.status) else {
        return false;
    };
    visibility.is_discoverable() && status != IdeaStatus::Archived
}

fn score_idea(prefs: &MatchPreferences, idea: &idea::Model) -> ScoreBreakdown {
    ScoreBreakdown {
        industry: industry_overlap(prefs, idea),
        stage: stage_match(prefs, idea),
        funding: funding_fit(prefs, idea.funding_needed),
        geography: geographic_overlap(prefs, idea),
        risk_timeline: risk_timeline_compatibility(prefs, idea),
    }
}

/// |prefs.industries ∩ {category, industry}| / |prefs.industries|,
/// case-insensitive. No industry preference means no constraint.
fn industry_overlap(prefs: &MatchPreferences, idea: &idea::Model) -> f64 {
    if prefs.industries.is_empty() {
        return 1.0;
    }

    let idea_terms: HashSet<String> = [idea.category.to_lowercase(), idea.industry.to_lowercase()]
        .into_iter()
        .collect();
    let wanted: HashSet<String> = prefs.industries.iter().map(|p| p.to_lowercase()).collect();

    let hits = wanted.iter().filter(|p| idea_terms.contains(*p)).count();
    hits as f64 / wanted.len() as f64
}

/// Exact stage 1.0, adjacent rung 0.5, otherwise 0.0; best over the
/// preferred set.
fn stage_match(prefs: &MatchPreferences, idea: &idea::Model) -> f64 {
    if prefs.stages.is_empty() {
        return 1.0;
    }
    let Some(stage) = IdeaStage::parse(&idea.stage) else {
        return 0.0;
    };

    prefs
        .stages
        .iter()
        .map(|preferred| {
            match (preferred.ordinal() - stage.ordinal()).abs() {
                0 => 1.0,
                1 => 0.5,
                _ => 0.0,
            }
        })
        .fold(0.0, f64::max)
}

/// 1.0 inside [min, max]; needed/min below, max/needed above. Ideas that
/// never stated a funding need sit at neutral 0.5.
fn funding_fit(prefs: &MatchPreferences, funding_needed: i64) -> f64 {
    if funding_needed <= 0 {
        return 0.5;
    }

    let needed = funding_needed as f64;
    let min = prefs.funding_min as f64;
    let max = prefs.funding_max as f64;

    if needed < min {
        needed / min
    } else if needed > max {
        if max <= 0.0 {
            0.0
        } else {
            max / needed
        }
    } else {
        1.0
    }
}

/// Set-intersection ratio over preferred regions, case-insensitive.
fn geographic_overlap(prefs: &MatchPreferences, idea: &idea::Model) -> f64 {
    if prefs.regions.is_empty() {
        return 1.0;
    }

    let idea_regions: HashSet<String> = decode_string_list(&idea.regions)
        .iter()
        .map(|r| r.to_lowercase())
        .collect();
    let wanted: HashSet<String> = prefs.regions.iter().map(|r| r.to_lowercase()).collect();

    let hits = wanted.iter().filter(|r| idea_regions.contains(*r)).count();
    hits as f64 / wanted.len() as f64
}

/// Earlier stages imply higher risk.
fn implied_risk(stage: IdeaStage) -> RiskTolerance {
    match stage {
        IdeaStage::Concept | IdeaStage::Prototype => RiskTolerance::High,
        IdeaStage::Mvp | IdeaStage::Seed => RiskTolerance::Medium,
        IdeaStage::Growth | IdeaStage::Scale => RiskTolerance::Low,
    }
}

/// Earlier stages imply a longer horizon to any return.
fn implied_horizon(stage: IdeaStage) -> InvestmentTimeline {
    match stage {
        IdeaStage::Concept | IdeaStage::Prototype => InvestmentTimeline::TwoYearsPlus,
        IdeaStage::Mvp | IdeaStage::Seed => InvestmentTimeline::OneYear,
        IdeaStage::Growth => InvestmentTimeline::SixMonths,
        IdeaStage::Scale => InvestmentTimeline::ThreeMonths,
    }
}

/// Distance between stage-implied risk/horizon and the investor's stated
/// tolerance/timeline, normalized to [0, 1] and averaged.
fn risk_timeline_compatibility(prefs: &MatchPreferences, idea: &idea::Model) -> f64 {
    let Some(stage) = IdeaStage::parse(&idea.stage) else {
        // Unknown stage carries no risk signal either way.
        return 0.5;
    };

    let risk_gap = (implied_risk(stage).ordinal() - prefs.risk_tolerance.ordinal()).abs() as f64;
    let risk_score = 1.0 - risk_gap / 2.0;

    let horizon_gap = (implied_horizon(stage).ordinal() - prefs.timeline.ordinal()).abs() as f64;
    let timeline_score = 1.0 - horizon_gap / 3.0;

    (risk_score + timeline_score) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_prefs() -> MatchPreferences {
        MatchPreferences {
            industries: vec!["AI/ML".to_string()],
            stages: vec![IdeaStage::Seed],
            funding_min: 10_000,
            funding_max: 1_000_000,
            regions: vec!["NA".to_string()],
            risk_tolerance: RiskTolerance::Medium,
            timeline: InvestmentTimeline::SixMonths,
        }
    }

    fn eligible_idea(id: &str, created_at: i64) -> idea::Model {
        idea::Model {
            id: id.to_string(),
            owner_id: "owner-1".to_string(),
            title: format!("Idea {id}"),
            problem: "P".to_string(),
            solution: "S".to_string(),
            target_market: None,
            category: "AI/ML".to_string(),
            industry: "software".to_string(),
            stage: "seed".to_string(),
            visibility: "public".to_string(),
            status: "active".to_string(),
            funding_needed: 50_000,
            regions: r#"["NA"]"#.to_string(),
            tags: "[]".to_string(),
            ai_score: None,
            ai_feedback: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn ai_ml_seed_scenario_matches_with_expected_score() {
        let pool = vec![eligible_idea("idea-1", 100)];

        let outcome = find_matches(&base_prefs(), &pool, 10, 0.1, &MatchWeights::default())
            .expect("valid arguments");

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.pool_size, 1);
        assert_eq!(outcome.eligible_count, 1);

        let matched = &outcome.matches[0];
        assert_eq!(matched.idea.id, "idea-1");
        assert!(matched.score > 0.1);

        // industry 1.0, stage 1.0, funding 1.0, geography 1.0; risk/timeline
        // averages an exact risk fit with a one-step horizon gap.
        assert!((matched.score - 0.975).abs() < 1e-9);
        assert_eq!(matched.band, MatchBand::Perfect);
        assert_eq!(matched.breakdown.industry, 1.0);
        assert!((matched.breakdown.risk_timeline - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_min_score_outside_unit_interval() {
        let pool = vec![eligible_idea("idea-1", 100)];

        for bad in [-0.1, 1.5] {
            let result = find_matches(&base_prefs(), &pool, 10, bad, &MatchWeights::default());
            assert_eq!(result.unwrap_err(), MatchError::MinScoreOutOfRange(bad));
        }
    }

    #[test]
    fn rejects_inverted_funding_range() {
        let mut prefs = base_prefs();
        prefs.funding_min = 500_000;
        prefs.funding_max = 100;

        let result = find_matches(&prefs, &[], 10, 0.0, &MatchWeights::default());
        assert_eq!(
            result.unwrap_err(),
            MatchError::FundingRangeInverted {
                min: 500_000,
                max: 100
            }
        );
    }

    #[test]
    fn rejects_oversized_top_k() {
        let result = find_matches(
            &base_prefs(),
            &[],
            MAX_TOP_K + 1,
            0.0,
            &MatchWeights::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            MatchError::TopKTooLarge {
                got: MAX_TOP_K + 1,
                max: MAX_TOP_K
            }
        );
    }

    #[test]
    fn empty_pool_is_empty_result_not_error() {
        let outcome = find_matches(&base_prefs(), &[], 10, 0.0, &MatchWeights::default())
            .expect("empty pool is fine");

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.pool_size, 0);
        assert_eq!(outcome.eligible_count, 0);
    }

    #[test]
    fn archived_and_private_pool_yields_empty_not_error() {
        let mut archived = eligible_idea("idea-1", 100);
        archived.status = "archived".to_string();
        let mut private = eligible_idea("idea-2", 200);
        private.visibility = "private".to_string();
        let mut archived_visibility = eligible_idea("idea-3", 300);
        archived_visibility.visibility = "archived".to_string();

        let pool = vec![archived, private, archived_visibility];
        let outcome = find_matches(&base_prefs(), &pool, 10, 0.0, &MatchWeights::default())
            .expect("still not an error");

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.pool_size, 3);
        assert_eq!(outcome.eligible_count, 0);
    }

    #[test]
    fn both_public_visibilities_are_eligible() {
        let public = eligible_idea("idea-1", 100);
        let mut legacy = eligible_idea("idea-2", 200);
        legacy.visibility = "public_ideas".to_string();

        let outcome = find_matches(
            &base_prefs(),
            &[public, legacy],
            10,
            0.0,
            &MatchWeights::default(),
        )
        .expect("valid arguments");

        assert_eq!(outcome.eligible_count, 2);
        assert_eq!(outcome.matches.len(), 2);
    }

    #[test]
    fn unparseable_visibility_fails_closed() {
        let mut weird = eligible_idea("idea-1", 100);
        weird.visibility = "everyone".to_string();

        let outcome = find_matches(&base_prefs(), &[weird], 10, 0.0, &MatchWeights::default())
            .expect("valid arguments");

        assert_eq!(outcome.pool_size, 1);
        assert_eq!(outcome.eligible_count, 0);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn results_are_sorted_and_ties_break_on_recency() {
        // Identical content, different creation times: equal scores.
        let older = eligible_idea("older", 100);
        let newer = eligible_idea("newer", 900);
        let mut weaker = eligible_idea("weaker", 500);
        weaker.category = "fintech".to_string();
        weaker.industry = "banking".to_string();

        let outcome = find_matches(
            &base_prefs(),
            &[older, weaker, newer],
            10,
            0.0,
            &MatchWeights::default(),
        )
        .expect("valid arguments");

        let ids: Vec<&str> = outcome.matches.iter().map(|m| m.idea.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older", "weaker"]);

        for pair in outcome.matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn top_k_truncates_after_ranking() {
        let pool: Vec<idea::Model> = (0..5)
            .map(|i| eligible_idea(&format!("idea-{i}"), i * 100))
            .collect();

        let outcome = find_matches(&base_prefs(), &pool, 2, 0.0, &MatchWeights::default())
            .expect("valid arguments");

        assert_eq!(outcome.matches.len(), 2);
        // Highest created_at wins the tie, so truncation kept the newest.
        assert_eq!(outcome.matches[0].idea.id, "idea-4");
        assert_eq!(outcome.eligible_count, 5);
    }

    #[test]
    fn min_score_filters_weak_matches() {
        let strong = eligible_idea("strong", 100);
        let mut weak = eligible_idea("weak", 200);
        weak.category = "agriculture".to_string();
        weak.industry = "farming".to_string();
        weak.stage = "concept".to_string();
        weak.funding_needed = 50_000_000;
        weak.regions = r#"["APAC"]"#.to_string();

        let outcome = find_matches(
            &base_prefs(),
            &[strong, weak],
            10,
            0.5,
            &MatchWeights::default(),
        )
        .expect("valid arguments");

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].idea.id, "strong");
        assert!(outcome.matches.iter().all(|m| m.score >= 0.5));
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let pool: Vec<idea::Model> = (0..4)
            .map(|i| eligible_idea(&format!("idea-{i}"), i * 10))
            .collect();

        let first = find_matches(&base_prefs(), &pool, 3, 0.2, &MatchWeights::default())
            .expect("valid arguments");
        let second = find_matches(&base_prefs(), &pool, 3, 0.2, &MatchWeights::default())
            .expect("valid arguments");

        let first_ids: Vec<&str> = first.matches.iter().map(|m| m.idea.id.as_str()).collect();
        let second_ids: Vec<&str> = second.matches.iter().map(|m| m.idea.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);

        for (a, b) in first.matches.iter().zip(second.matches.iter()) {
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn empty_preference_sets_mean_no_constraint() {
        let prefs = MatchPreferences {
            industries: vec![],
            stages: vec![],
            regions: vec![],
            funding_min: 10_000,
            funding_max: 1_000_000,
            risk_tolerance: RiskTolerance::Medium,
            timeline: InvestmentTimeline::OneYear,
        };
        let pool = vec![eligible_idea("idea-1", 100)];

        let outcome =
            find_matches(&prefs, &pool, 10, 0.0, &MatchWeights::default()).expect("valid");

        let breakdown = &outcome.matches[0].breakdown;
        assert_eq!(breakdown.industry, 1.0);
        assert_eq!(breakdown.stage, 1.0);
        assert_eq!(breakdown.geography, 1.0);
        // Seed stage, medium tolerance, one-year timeline: a perfect fit.
        assert_eq!(breakdown.risk_timeline, 1.0);
        assert_eq!(outcome.matches[0].score, 1.0);
    }

    #[test]
    fn unknown_funding_scores_neutral() {
        let mut unfunded = eligible_idea("idea-1", 100);
        unfunded.funding_needed = 0;

        let outcome = find_matches(
            &base_prefs(),
            &[unfunded],
            10,
            0.0,
            &MatchWeights::default(),
        )
        .expect("valid arguments");

        assert_eq!(outcome.matches[0].breakdown.funding, 0.5);
    }

    #[test]
    fn funding_fit_decays_outside_the_range() {
        let prefs = base_prefs();

        // Below min: needed/min.
        assert!((funding_fit(&prefs, 5_000) - 0.5).abs() < 1e-9);
        // Above max: max/needed.
        assert!((funding_fit(&prefs, 2_000_000) - 0.5).abs() < 1e-9);
        // Inside: full credit.
        assert_eq!(funding_fit(&prefs, 10_000), 1.0);
        assert_eq!(funding_fit(&prefs, 1_000_000), 1.0);
    }

    #[test]
    fn adjacent_stage_gets_half_credit() {
        let mut adjacent = eligible_idea("idea-1", 100);
        adjacent.stage = "growth".to_string();

        let breakdown = score_idea(&base_prefs(), &adjacent);
        assert_eq!(breakdown.stage, 0.5);

        let mut distant = eligible_idea("idea-2", 100);
        distant.stage = "concept".to_string();
        let breakdown = score_idea(&base_prefs(), &distant);
        assert_eq!(breakdown.stage, 0.0);
    }

    #[test]
    fn bands_classify_on_documented_boundaries() {
        assert_eq!(MatchBand::classify(0.95), MatchBand::Perfect);
        assert_eq!(MatchBand::classify(0.9), MatchBand::Perfect);
        assert_eq!(MatchBand::classify(0.7), MatchBand::High);
        assert_eq!(MatchBand::classify(0.5), MatchBand::Promising);
        assert_eq!(MatchBand::classify(0.49), MatchBand::Exploratory);
    }
}
