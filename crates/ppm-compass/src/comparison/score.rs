use serde::{Deserialize, Serialize};

use super::domain::{Criterion, CriterionId, Tool};
use super::resolver::{RatingResolver, ResolutionStep};

/// Points awarded for meeting a requirement exactly.
const MET_BASE: i32 = 8;
/// Cap on the bonus for exceeding a requirement.
const EXCESS_BONUS_CAP: i32 = 2;
/// Starting points for a missed requirement, before the shortfall penalty.
const SHORTFALL_BASE: i32 = 7;
/// Points lost per rating point of shortfall.
const SHORTFALL_PENALTY: i32 = 2;
/// Score forced when a tool meets every requirement.
pub const PERFECT_SCORE: f64 = 10.0;

/// Presentation band for a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Best,
    Middle,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreTier::Best
        } else if score >= 6.0 {
            ScoreTier::Middle
        } else {
            ScoreTier::Low
        }
    }
}

/// Per-criterion contribution, kept so callers can explain a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionContribution {
    pub criterion_id: CriterionId,
    pub tool_rating: u8,
    pub user_rating: u8,
    pub contribution: u8,
    pub source: Option<ResolutionStep>,
}

impl CriterionContribution {
    pub fn meets_requirement(&self) -> bool {
        self.tool_rating >= self.user_rating
    }
}

/// Full scoring trail for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub meets_all_requirements: bool,
    pub contributions: Vec<CriterionContribution>,
}

/// Contribution of a single criterion to the average.
pub fn contribution(tool_rating: u8, user_rating: u8) -> u8 {
    let tool_rating = i32::from(tool_rating);
    let user_rating = i32::from(user_rating);

    let points = if tool_rating >= user_rating {
        MET_BASE + (tool_rating - user_rating).min(EXCESS_BONUS_CAP)
    } else {
        (SHORTFALL_BASE - (user_rating - tool_rating) * SHORTFALL_PENALTY).max(0)
    };

    points as u8
}

/// Computes 0-10 match scores of tools against weighted criteria.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    resolver: RatingResolver,
}

impl MatchScorer {
    pub fn new(resolver: RatingResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &RatingResolver {
        &self.resolver
    }

    pub fn score(&self, tool: &Tool, criteria: &[Criterion]) -> f64 {
        self.breakdown(tool, criteria).score
    }

    pub fn breakdown(&self, tool: &Tool, criteria: &[Criterion]) -> ScoreBreakdown {
        let contributions: Vec<CriterionContribution> = criteria
            .iter()
            .map(|criterion| {
                let resolution = self.resolver.resolve_traced(tool, criterion);
                CriterionContribution {
                    criterion_id: criterion.id.clone(),
                    tool_rating: resolution.rating,
                    user_rating: criterion.user_rating,
                    contribution: contribution(resolution.rating, criterion.user_rating),
                    source: resolution.step,
                }
            })
            .collect();

        if contributions.is_empty() {
            return ScoreBreakdown {
                score: 0.0,
                meets_all_requirements: false,
                contributions,
            };
        }

        let meets_all_requirements = contributions
            .iter()
            .all(CriterionContribution::meets_requirement);

        let score = if meets_all_requirements {
            PERFECT_SCORE
        } else {
            let total: u32 = contributions
                .iter()
                .map(|entry| u32::from(entry.contribution))
                .sum();
            f64::from(total) / contributions.len() as f64
        };

        ScoreBreakdown {
            score,
            meets_all_requirements,
            contributions,
        }
    }
}
