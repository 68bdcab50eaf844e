//! Tool comparison: rating resolution, match scoring, filtering, and ranking.
//!
//! Data flows from a [`Catalog`] (or any other source of [`Tool`] and
//! [`Criterion`] records) through [`ToolFilter`] into [`MatchScorer`];
//! [`ComparisonEngine`] wires the two together and [`ComparisonSession`] keeps
//! the user's edits between calls. None of the matching operations fail:
//! malformed tool data resolves to the unrated sentinel and incomplete filter
//! conditions are ignored.

pub mod defaults;
pub mod domain;
pub mod filter;
pub mod import;
pub mod ranking;
pub mod resolver;
pub mod router;
pub mod score;
pub mod session;

#[cfg(test)]
mod tests;

pub use defaults::default_criteria;
pub use domain::{
    ComparisonOperator, Criterion, CriterionId, FilterCondition, FilterKind, FilterMode,
    RatingDescriptions, RatingsMap, Tag, TagType, Tool, ToolCriterion, ToolId,
    DEFAULT_USER_RATING, RATING_MAX, RATING_MIN, UNRATED,
};
pub use filter::{FilterRatingSource, ToolFilter};
pub use import::{import_tools_csv, Catalog, CatalogImportError};
pub use ranking::{ComparisonEngine, RankedTool};
pub use resolver::{AliasTable, RatingResolver, Resolution, ResolutionFailure, ResolutionStep};
pub use router::comparison_router;
pub use score::{CriterionContribution, MatchScorer, ScoreBreakdown, ScoreTier, PERFECT_SCORE};
pub use session::{
    ComparisonSession, CriteriaBoard, SessionError, ToolShelf, MINIMUM_ACTIVE_CRITERIA,
};
