use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{Criterion, FilterCondition, FilterMode, Tool, ToolId};
use super::filter::{FilterRatingSource, ToolFilter};
use super::resolver::{AliasTable, RatingResolver};
use super::score::{MatchScorer, ScoreBreakdown, ScoreTier};

/// Tool with its match score, ready for list rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTool {
    pub tool_id: ToolId,
    pub name: String,
    pub score: f64,
    pub tier: ScoreTier,
    pub breakdown: ScoreBreakdown,
}

/// Stateless facade over resolution, scoring, and filtering.
#[derive(Debug, Clone, Default)]
pub struct ComparisonEngine {
    scorer: MatchScorer,
    filter: ToolFilter,
}

impl ComparisonEngine {
    pub fn new(aliases: AliasTable, rating_source: FilterRatingSource) -> Self {
        let resolver = RatingResolver::new(aliases);
        Self {
            scorer: MatchScorer::new(resolver.clone()),
            filter: ToolFilter::new(resolver, rating_source),
        }
    }

    pub fn resolver(&self) -> &RatingResolver {
        self.scorer.resolver()
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn filter(&self) -> &ToolFilter {
        &self.filter
    }

    pub fn resolve_rating(&self, tool: &Tool, criterion: &Criterion) -> u8 {
        self.scorer.resolver().resolve(tool, criterion)
    }

    pub fn score(&self, tool: &Tool, criteria: &[Criterion]) -> f64 {
        self.scorer.score(tool, criteria)
    }

    pub fn filter_tools(
        &self,
        tools: &[Tool],
        conditions: &[FilterCondition],
        mode: FilterMode,
        include_removed: bool,
    ) -> Vec<Tool> {
        self.filter
            .filter_tools(tools, conditions, mode, include_removed)
    }

    /// Filters, scores, and sorts tools best match first; ties keep input order.
    pub fn rank(
        &self,
        tools: &[Tool],
        criteria: &[Criterion],
        conditions: &[FilterCondition],
        mode: FilterMode,
        include_removed: bool,
    ) -> Vec<RankedTool> {
        let candidates = self.filter_tools(tools, conditions, mode, include_removed);
        let ranked = self.rank_all(&candidates, criteria);

        info!(
            tools = tools.len(),
            candidates = ranked.len(),
            criteria = criteria.len(),
            top = ranked.first().map(|entry| entry.tool_id.0.as_str()),
            "ranked tools"
        );
        ranked
    }

    /// Scores and sorts `tools` without filtering.
    pub fn rank_all(&self, tools: &[Tool], criteria: &[Criterion]) -> Vec<RankedTool> {
        let mut ranked: Vec<RankedTool> = tools
            .iter()
            .map(|tool| {
                let breakdown = self.scorer.breakdown(tool, criteria);
                RankedTool {
                    tool_id: tool.id.clone(),
                    name: tool.name.clone(),
                    score: breakdown.score,
                    tier: ScoreTier::from_score(breakdown.score),
                    breakdown,
                }
            })
            .collect();

        ranked.sort_by(|left, right| {
            right
                .score
                .partial_cmp(&left.score)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }
}
