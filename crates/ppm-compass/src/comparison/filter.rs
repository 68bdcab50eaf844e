use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::domain::{
    ComparisonOperator, Criterion, FilterCondition, FilterKind, FilterMode, Tool, RATING_MIN,
    UNRATED,
};
use super::resolver::{rating_at, RatingResolver, RawRating};

/// Where `Criteria` conditions read a tool's rating from.
///
/// `RatingsMap` only consults `tool.ratings[criterion_id]`, which ignores tools
/// whose only rating source is the `criteria` array. `ResolutionChain` runs the
/// full resolver instead and can therefore admit more tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRatingSource {
    #[default]
    RatingsMap,
    ResolutionChain,
}

impl FilterCondition {
    /// A condition still being edited; it is ignored rather than rejected.
    ///
    /// Incomplete means no type, no value, or a `Criteria` condition without
    /// an operator or rating. A whitespace-only value also counts as missing:
    /// no tag or criterion id is blank, so such a condition could only ever
    /// reject every tool. A rating outside the 1-5 scale is still complete and
    /// is compared as written, so `> 6` matches nothing.
    pub fn is_complete(&self) -> bool {
        let has_value = self
            .value
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty());

        match self.kind {
            None => false,
            Some(_) if !has_value => false,
            Some(FilterKind::Criteria) => self.operator.is_some() && self.rating.is_some(),
            Some(FilterKind::Methodology | FilterKind::Function) => true,
        }
    }
}

/// A condition that passed [`FilterCondition::is_complete`].
#[derive(Debug, Clone, Copy)]
enum Predicate<'a> {
    Methodology(&'a str),
    Function(&'a str),
    Criteria {
        criterion_id: &'a str,
        operator: ComparisonOperator,
        rating: u8,
    },
}

impl<'a> Predicate<'a> {
    fn from_condition(condition: &'a FilterCondition) -> Option<Self> {
        if !condition.is_complete() {
            return None;
        }
        let value = condition.value.as_deref()?;

        match condition.kind? {
            FilterKind::Methodology => Some(Predicate::Methodology(value)),
            FilterKind::Function => Some(Predicate::Function(value)),
            FilterKind::Criteria => Some(Predicate::Criteria {
                criterion_id: value,
                operator: condition.operator?,
                rating: condition.rating?,
            }),
        }
    }
}

/// Narrows tool lists by tag membership and rating thresholds.
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    resolver: RatingResolver,
    rating_source: FilterRatingSource,
}

impl ToolFilter {
    pub fn new(resolver: RatingResolver, rating_source: FilterRatingSource) -> Self {
        Self {
            resolver,
            rating_source,
        }
    }

    pub fn rating_source(&self) -> FilterRatingSource {
        self.rating_source
    }

    /// Tools satisfying the complete conditions under `mode`, in input order.
    ///
    /// With no complete conditions the input is returned unchanged, removed
    /// tools included.
    pub fn filter_tools(
        &self,
        tools: &[Tool],
        conditions: &[FilterCondition],
        mode: FilterMode,
        include_removed: bool,
    ) -> Vec<Tool> {
        let predicates: Vec<Predicate<'_>> = conditions
            .iter()
            .filter_map(Predicate::from_condition)
            .collect();

        if predicates.is_empty() {
            debug!(
                ignored = conditions.len(),
                "no complete filter conditions; returning tools unchanged"
            );
            return tools.to_vec();
        }

        let kept: Vec<Tool> = tools
            .iter()
            .filter(|tool| include_removed || !tool.is_removed())
            .filter(|tool| self.matches(tool, &predicates, mode))
            .cloned()
            .collect();

        debug!(
            conditions = predicates.len(),
            ?mode,
            input = tools.len(),
            kept = kept.len(),
            "filtered tools"
        );
        kept
    }

    /// Whether one tool passes the complete conditions under `mode`.
    pub fn matches_conditions(
        &self,
        tool: &Tool,
        conditions: &[FilterCondition],
        mode: FilterMode,
    ) -> bool {
        let predicates: Vec<Predicate<'_>> = conditions
            .iter()
            .filter_map(Predicate::from_condition)
            .collect();
        predicates.is_empty() || self.matches(tool, &predicates, mode)
    }

    fn matches(&self, tool: &Tool, predicates: &[Predicate<'_>], mode: FilterMode) -> bool {
        match mode {
            FilterMode::And => predicates
                .iter()
                .all(|predicate| self.evaluate(tool, predicate)),
            FilterMode::Or => predicates
                .iter()
                .any(|predicate| self.evaluate(tool, predicate)),
        }
    }

    fn evaluate(&self, tool: &Tool, predicate: &Predicate<'_>) -> bool {
        match *predicate {
            Predicate::Methodology(value) => tool.methodologies.iter().any(|entry| entry == value),
            Predicate::Function(value) => tool.functions.iter().any(|entry| entry == value),
            Predicate::Criteria {
                criterion_id,
                operator,
                rating,
            } => {
                let actual = self.criteria_rating(tool, criterion_id);
                let passed = operator.apply(actual, rating);
                trace!(
                    tool = %tool.id,
                    criterion_id,
                    actual,
                    operator = operator.symbol(),
                    rating,
                    passed,
                    "criteria condition"
                );
                passed
            }
        }
    }

    fn criteria_rating(&self, tool: &Tool, criterion_id: &str) -> u8 {
        match self.rating_source {
            FilterRatingSource::RatingsMap => match rating_at(tool, criterion_id) {
                RawRating::Rating(rating) => rating,
                RawRating::Absent | RawRating::Malformed(_) => UNRATED,
            },
            FilterRatingSource::ResolutionChain => {
                // Conditions only carry the id, so name-based steps cannot match.
                let criterion = Criterion::new(criterion_id, "", RATING_MIN);
                self.resolver.resolve(tool, &criterion)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_conditions_are_detected() {
        let mut condition =
            FilterCondition::criteria("c1", "security", ComparisonOperator::AtLeast, 4);
        assert!(condition.is_complete());

        condition.rating = Some(0);
        assert!(condition.is_complete());

        condition.rating = None;
        assert!(!condition.is_complete());

        condition.rating = Some(4);
        condition.operator = None;
        assert!(!condition.is_complete());

        let mut tag = FilterCondition::methodology("c2", "Agile");
        assert!(tag.is_complete());
        tag.value = Some("  ".to_string());
        assert!(!tag.is_complete());
        tag.value = Some("Agile".to_string());
        tag.kind = None;
        assert!(!tag.is_complete());
    }

    #[test]
    fn tag_conditions_ignore_operator_and_rating() {
        let mut condition = FilterCondition::function("c1", "Budgeting");
        condition.rating = Some(42);
        assert!(condition.is_complete());
    }
}
