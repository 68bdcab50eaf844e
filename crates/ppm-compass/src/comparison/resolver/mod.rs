mod aliases;

pub use aliases::AliasTable;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{Criterion, CriterionId, Tool, ToolCriterion, ToolId, RATING_MAX, UNRATED};

/// Lookup strategies tried, in order, when resolving a tool's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStep {
    CriterionId,
    CriterionName,
    CriterionNameCaseInsensitive,
    RatingsKey,
    RatingsAlias,
    RatingsKeyCaseInsensitive,
}

impl ResolutionStep {
    pub const CHAIN: [ResolutionStep; 6] = [
        ResolutionStep::CriterionId,
        ResolutionStep::CriterionName,
        ResolutionStep::CriterionNameCaseInsensitive,
        ResolutionStep::RatingsKey,
        ResolutionStep::RatingsAlias,
        ResolutionStep::RatingsKeyCaseInsensitive,
    ];
}

/// Rating found for a tool/criterion pair and the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub rating: u8,
    pub step: Option<ResolutionStep>,
}

impl Resolution {
    pub fn unrated() -> Self {
        Self {
            rating: UNRATED,
            step: None,
        }
    }
}

/// Why a resolution fell through to the unrated sentinel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFailure {
    #[error("tool '{tool}' has no rating for criterion '{criterion}'")]
    Missing { tool: ToolId, criterion: CriterionId },
    #[error("tool '{tool}' has only malformed ratings for criterion '{criterion}': {}", .details.join("; "))]
    Malformed {
        tool: ToolId,
        criterion: CriterionId,
        details: Vec<String>,
    },
}

/// Outcome of reading a single raw rating value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawRating {
    Rating(u8),
    Absent,
    Malformed(String),
}

/// Interprets a raw JSON rating. Only finite numbers count; they are rounded
/// and clamped into `[0, 5]`.
pub(crate) fn read_rating(value: &Value) -> RawRating {
    match value {
        Value::Null => RawRating::Absent,
        Value::Number(number) => match number.as_f64() {
            Some(raw) if raw.is_finite() => {
                RawRating::Rating(raw.round().clamp(UNRATED as f64, RATING_MAX as f64) as u8)
            }
            _ => RawRating::Malformed(format!("non-finite number {number}")),
        },
        other => RawRating::Malformed(format!("expected a number, found {other}")),
    }
}

/// Resolves a tool's capability rating for a criterion across the legacy data shapes.
#[derive(Debug, Clone)]
pub struct RatingResolver {
    aliases: AliasTable,
}

impl Default for RatingResolver {
    fn default() -> Self {
        Self::new(AliasTable::builtin())
    }
}

impl RatingResolver {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Rating in `[0, 5]`; `0` when nothing usable is found.
    pub fn resolve(&self, tool: &Tool, criterion: &Criterion) -> u8 {
        self.resolve_traced(tool, criterion).rating
    }

    /// Like [`resolve`](Self::resolve) but also reports which step matched.
    pub fn resolve_traced(&self, tool: &Tool, criterion: &Criterion) -> Resolution {
        match self.try_resolve(tool, criterion) {
            Ok(resolution) => resolution,
            Err(failure @ ResolutionFailure::Missing { .. }) => {
                debug!(%failure, "falling back to unrated");
                Resolution::unrated()
            }
            Err(failure @ ResolutionFailure::Malformed { .. }) => {
                warn!(%failure, "falling back to unrated");
                Resolution::unrated()
            }
        }
    }

    pub fn try_resolve(
        &self,
        tool: &Tool,
        criterion: &Criterion,
    ) -> Result<Resolution, ResolutionFailure> {
        let mut malformed = Vec::new();

        for step in ResolutionStep::CHAIN {
            match self.lookup(step, tool, criterion) {
                RawRating::Rating(rating) => {
                    return Ok(Resolution {
                        rating,
                        step: Some(step),
                    })
                }
                RawRating::Malformed(detail) => malformed.push(format!("{step:?}: {detail}")),
                RawRating::Absent => {}
            }
        }

        if malformed.is_empty() {
            Err(ResolutionFailure::Missing {
                tool: tool.id.clone(),
                criterion: criterion.id.clone(),
            })
        } else {
            Err(ResolutionFailure::Malformed {
                tool: tool.id.clone(),
                criterion: criterion.id.clone(),
                details: malformed,
            })
        }
    }

    fn lookup(&self, step: ResolutionStep, tool: &Tool, criterion: &Criterion) -> RawRating {
        let id = criterion.id.as_str();
        let name = criterion.name.as_str();

        match step {
            ResolutionStep::CriterionId => {
                first_entry(tool, |entry| entry.id.as_deref() == Some(id))
            }
            ResolutionStep::CriterionName if !name.is_empty() => {
                first_entry(tool, |entry| entry.name.as_deref() == Some(name))
            }
            ResolutionStep::CriterionNameCaseInsensitive if !name.is_empty() => {
                let wanted = name.to_lowercase();
                first_entry(tool, |entry| {
                    entry
                        .name
                        .as_deref()
                        .is_some_and(|candidate| candidate.to_lowercase() == wanted)
                })
            }
            ResolutionStep::RatingsKey => rating_at(tool, id),
            ResolutionStep::RatingsAlias => {
                let mut outcome = RawRating::Absent;
                for alias in self.aliases.aliases_for(id) {
                    match rating_at(tool, alias) {
                        found @ RawRating::Rating(_) => return found,
                        malformed @ RawRating::Malformed(_) => outcome = malformed,
                        RawRating::Absent => {}
                    }
                }
                outcome
            }
            ResolutionStep::RatingsKeyCaseInsensitive => {
                let Some(ratings) = tool.ratings.as_ref() else {
                    return RawRating::Absent;
                };
                let wanted_id = id.to_lowercase();
                let wanted_name = name.to_lowercase();
                let mut outcome = RawRating::Absent;
                for (key, value) in ratings {
                    let key = key.to_lowercase();
                    if key != wanted_id && (wanted_name.is_empty() || key != wanted_name) {
                        continue;
                    }
                    match read_rating(value) {
                        found @ RawRating::Rating(_) => return found,
                        malformed @ RawRating::Malformed(_) => outcome = malformed,
                        RawRating::Absent => {}
                    }
                }
                outcome
            }
            ResolutionStep::CriterionName | ResolutionStep::CriterionNameCaseInsensitive => {
                RawRating::Absent
            }
        }
    }
}

fn first_entry<F>(tool: &Tool, matches: F) -> RawRating
where
    F: Fn(&ToolCriterion) -> bool,
{
    tool.criteria
        .as_deref()
        .and_then(|entries| entries.iter().find(|entry| matches(entry)))
        .map(|entry| match read_rating(&entry.ranking) {
            RawRating::Absent => RawRating::Malformed("criteria entry without ranking".to_string()),
            other => other,
        })
        .unwrap_or(RawRating::Absent)
}

/// Direct `ratings[key]` lookup.
pub(crate) fn rating_at(tool: &Tool, key: &str) -> RawRating {
    tool.ratings
        .as_ref()
        .and_then(|ratings| ratings.get(key))
        .map(read_rating)
        .unwrap_or(RawRating::Absent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_rating_rounds_and_clamps() {
        assert_eq!(read_rating(&json!(4)), RawRating::Rating(4));
        assert_eq!(read_rating(&json!(3.6)), RawRating::Rating(4));
        assert_eq!(read_rating(&json!(9)), RawRating::Rating(5));
        assert_eq!(read_rating(&json!(-2)), RawRating::Rating(0));
        assert_eq!(read_rating(&Value::Null), RawRating::Absent);
        assert!(matches!(read_rating(&json!("4")), RawRating::Malformed(_)));
    }

    #[test]
    fn failure_messages_name_tool_and_criterion() {
        let failure = ResolutionFailure::Malformed {
            tool: ToolId::from("atlas"),
            criterion: CriterionId::from("security"),
            details: vec!["CriterionId: expected a number, found \"high\"".to_string()],
        };
        let message = failure.to_string();
        assert!(message.contains("atlas"));
        assert!(message.contains("security"));
        assert!(message.contains("expected a number"));
    }
}
