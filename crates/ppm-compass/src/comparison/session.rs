use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    Criterion, CriterionId, FilterCondition, FilterMode, Tool, ToolId, RATING_MAX, RATING_MIN,
};
use super::ranking::{ComparisonEngine, RankedTool};

/// Fewest criteria a comparison may run with.
pub const MINIMUM_ACTIVE_CRITERIA: usize = 3;

/// Rejected edits to the in-memory comparison state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown criterion '{0}'")]
    UnknownCriterion(CriterionId),
    #[error("unknown tool '{0}'")]
    UnknownTool(ToolId),
    #[error("unknown filter condition '{0}'")]
    UnknownCondition(String),
    #[error("rating {rating} outside the 1-5 scale")]
    InvalidRating { rating: u8 },
    #[error("at least {minimum} criteria must stay active")]
    MinimumCriteria { minimum: usize },
}

/// Active and removed criteria; criteria move between the two, never vanish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaBoard {
    active: Vec<Criterion>,
    removed: Vec<Criterion>,
}

impl CriteriaBoard {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self {
            active: criteria,
            removed: Vec::new(),
        }
    }

    pub fn active(&self) -> &[Criterion] {
        &self.active
    }

    pub fn removed(&self) -> &[Criterion] {
        &self.removed
    }

    pub fn set_user_rating(&mut self, id: &CriterionId, rating: u8) -> Result<(), SessionError> {
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(SessionError::InvalidRating { rating });
        }
        let criterion = self
            .active
            .iter_mut()
            .chain(self.removed.iter_mut())
            .find(|criterion| &criterion.id == id)
            .ok_or_else(|| SessionError::UnknownCriterion(id.clone()))?;
        criterion.user_rating = rating;
        Ok(())
    }

    pub fn remove(&mut self, id: &CriterionId) -> Result<(), SessionError> {
        let index = self
            .active
            .iter()
            .position(|criterion| &criterion.id == id)
            .ok_or_else(|| SessionError::UnknownCriterion(id.clone()))?;
        if self.active.len() <= MINIMUM_ACTIVE_CRITERIA {
            return Err(SessionError::MinimumCriteria {
                minimum: MINIMUM_ACTIVE_CRITERIA,
            });
        }
        let criterion = self.active.remove(index);
        self.removed.push(criterion);
        Ok(())
    }

    pub fn restore(&mut self, id: &CriterionId) -> Result<(), SessionError> {
        let index = self
            .removed
            .iter()
            .position(|criterion| &criterion.id == id)
            .ok_or_else(|| SessionError::UnknownCriterion(id.clone()))?;
        let criterion = self.removed.remove(index);
        self.active.push(criterion);
        Ok(())
    }
}

/// Selected and removed tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolShelf {
    selected: Vec<Tool>,
    removed: Vec<Tool>,
}

impl ToolShelf {
    /// Splits tools on their `removed` flag.
    pub fn new(tools: Vec<Tool>) -> Self {
        let (removed, selected) = tools.into_iter().partition(Tool::is_removed);
        Self { selected, removed }
    }

    pub fn selected(&self) -> &[Tool] {
        &self.selected
    }

    pub fn removed(&self) -> &[Tool] {
        &self.removed
    }

    pub fn remove(&mut self, id: &ToolId) -> Result<(), SessionError> {
        let index = self
            .selected
            .iter()
            .position(|tool| &tool.id == id)
            .ok_or_else(|| SessionError::UnknownTool(id.clone()))?;
        let mut tool = self.selected.remove(index);
        tool.removed = Some(true);
        self.removed.push(tool);
        Ok(())
    }

    pub fn restore(&mut self, id: &ToolId) -> Result<(), SessionError> {
        let index = self
            .removed
            .iter()
            .position(|tool| &tool.id == id)
            .ok_or_else(|| SessionError::UnknownTool(id.clone()))?;
        let mut tool = self.removed.remove(index);
        tool.removed = Some(false);
        self.selected.push(tool);
        Ok(())
    }
}

/// Mutable comparison state for one user, driving the ranking pipeline.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSession {
    criteria: CriteriaBoard,
    tools: ToolShelf,
    conditions: Vec<FilterCondition>,
    mode: FilterMode,
}

impl ComparisonSession {
    pub fn new(criteria: Vec<Criterion>, tools: Vec<Tool>) -> Self {
        Self {
            criteria: CriteriaBoard::new(criteria),
            tools: ToolShelf::new(tools),
            conditions: Vec::new(),
            mode: FilterMode::default(),
        }
    }

    pub fn criteria(&self) -> &CriteriaBoard {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut CriteriaBoard {
        &mut self.criteria
    }

    pub fn tools(&self) -> &ToolShelf {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolShelf {
        &mut self.tools
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Adds a condition, replacing any existing one with the same id.
    pub fn add_condition(&mut self, condition: FilterCondition) {
        match self
            .conditions
            .iter_mut()
            .find(|existing| existing.id == condition.id)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }

    pub fn remove_condition(&mut self, id: &str) -> Result<FilterCondition, SessionError> {
        let index = self
            .conditions
            .iter()
            .position(|condition| condition.id == id)
            .ok_or_else(|| SessionError::UnknownCondition(id.to_string()))?;
        Ok(self.conditions.remove(index))
    }

    pub fn clear_conditions(&mut self) {
        self.conditions.clear();
    }

    /// Ranks the selected tools against the active criteria and live conditions.
    pub fn recommendations(&self, engine: &ComparisonEngine) -> Vec<RankedTool> {
        let ranked = engine.rank(
            self.tools.selected(),
            self.criteria.active(),
            &self.conditions,
            self.mode,
            false,
        );
        info!(
            selected = self.tools.selected().len(),
            active_criteria = self.criteria.active().len(),
            recommendations = ranked.len(),
            "session recommendations refreshed"
        );
        ranked
    }
}
