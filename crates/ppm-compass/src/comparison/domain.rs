use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Lowest importance or capability rating a user or curator can assign.
pub const RATING_MIN: u8 = 1;
/// Highest importance or capability rating.
pub const RATING_MAX: u8 = 5;
/// Sentinel returned when a tool carries no usable rating for a criterion.
pub const UNRATED: u8 = 0;
/// Importance assigned to a criterion before the user touches its slider.
pub const DEFAULT_USER_RATING: u8 = 3;

/// Flat `ratings` record, kept in the order the source supplied its keys.
pub type RatingsMap = Map<String, Value>;

/// Stable identifier of an evaluation dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(pub String);

impl CriterionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CriterionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Stable identifier of a candidate tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(pub String);

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Labels shown at both ends of a criterion's rating slider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDescriptions {
    #[serde(default)]
    pub low: String,
    #[serde(default)]
    pub high: String,
}

/// A named evaluation dimension carrying the user's importance weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating_descriptions: RatingDescriptions,
    #[serde(default = "default_user_rating")]
    pub user_rating: u8,
}

fn default_user_rating() -> u8 {
    DEFAULT_USER_RATING
}

impl Criterion {
    pub fn new(id: impl Into<String>, name: impl Into<String>, user_rating: u8) -> Self {
        Self {
            id: CriterionId(id.into()),
            name: name.into(),
            description: String::new(),
            rating_descriptions: RatingDescriptions::default(),
            user_rating,
        }
    }
}

/// A tool's curated capability rating for one criterion.
///
/// `ranking` stays a raw JSON value because upstream transforms do not always
/// produce a number; the resolver decides what counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCriterion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ranking: Value,
    #[serde(default)]
    pub description: String,
}

impl ToolCriterion {
    pub fn new(id: impl Into<String>, name: impl Into<String>, ranking: u8) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ranking: Value::from(ranking),
            description: String::new(),
        }
    }
}

/// Category of a tool tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    Methodology,
    Function,
}

impl TagType {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "methodology" => Some(Self::Methodology),
            "function" => Some(Self::Function),
            _ => None,
        }
    }
}

/// Nested `tag_type: { name }` shape produced by one of the data sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTypeRef {
    pub name: String,
}

/// Methodology or function label attached to a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
    #[serde(rename = "tag_type", default, skip_serializing_if = "Option::is_none")]
    pub nested_type: Option<TagTypeRef>,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: TagType) -> Self {
        let label = match kind {
            TagType::Methodology => "Methodology",
            TagType::Function => "Function",
        };
        Self {
            id: id.into(),
            name: name.into(),
            type_label: Some(label.to_string()),
            nested_type: None,
        }
    }

    /// Tag category from whichever shape the record carries; the flat `type` wins.
    pub fn kind(&self) -> Option<TagType> {
        self.type_label
            .as_deref()
            .and_then(TagType::parse)
            .or_else(|| {
                self.nested_type
                    .as_ref()
                    .and_then(|nested| TagType::parse(&nested.name))
            })
    }
}

/// Candidate software product compared against the user's criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_criteria",
        skip_serializing_if = "Option::is_none"
    )]
    pub criteria: Option<Vec<ToolCriterion>>,
    #[serde(
        default,
        deserialize_with = "lenient_ratings",
        skip_serializing_if = "Option::is_none"
    )]
    pub ratings: Option<RatingsMap>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub methodologies: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

impl Tool {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ToolId(id.into()),
            name: name.into(),
            criteria: None,
            ratings: None,
            tags: Vec::new(),
            methodologies: Vec::new(),
            functions: Vec::new(),
            removed: None,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removed == Some(true)
    }

    /// Fills `methodologies` and `functions` from `tags` when they were not supplied.
    pub fn derive_tag_lists(&mut self) {
        if self.methodologies.is_empty() {
            self.methodologies = self.tag_names(TagType::Methodology);
        }
        if self.functions.is_empty() {
            self.functions = self.tag_names(TagType::Function);
        }
    }

    fn tag_names(&self, kind: TagType) -> Vec<String> {
        self.tags
            .iter()
            .filter(|tag| tag.kind() == Some(kind))
            .map(|tag| tag.name.clone())
            .collect()
    }
}

/// Reads `criteria` as an array of entries. Any other shape, and any entry that
/// is not an object, is dropped with a warning instead of failing the record.
fn lenient_criteria<'de, D>(deserializer: D) -> Result<Option<Vec<ToolCriterion>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let entries = match raw {
        Value::Null => return Ok(None),
        Value::Array(entries) => entries,
        other => {
            warn!(found = json_kind(&other), "ignoring tool criteria that is not an array");
            return Ok(None);
        }
    };

    let criteria = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<ToolCriterion>(entry)
                .map_err(|err| warn!(index, %err, "ignoring malformed tool criteria entry"))
                .ok()
        })
        .collect();
    Ok(Some(criteria))
}

/// Reads `ratings` as an object; any other shape is dropped with a warning.
fn lenient_ratings<'de, D>(deserializer: D) -> Result<Option<RatingsMap>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => {
            warn!(found = json_kind(&other), "ignoring tool ratings that are not an object");
            Ok(None)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Which attribute a filter condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    Methodology,
    Function,
    Criteria,
}

/// Comparison applied by `Criteria` conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = "<")]
    LessThan,
}

impl ComparisonOperator {
    pub fn apply(self, actual: u8, threshold: u8) -> bool {
        match self {
            ComparisonOperator::GreaterThan => actual > threshold,
            ComparisonOperator::AtLeast => actual >= threshold,
            ComparisonOperator::Equal => actual == threshold,
            ComparisonOperator::AtMost => actual <= threshold,
            ComparisonOperator::LessThan => actual < threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::AtLeast => ">=",
            ComparisonOperator::Equal => "=",
            ComparisonOperator::AtMost => "<=",
            ComparisonOperator::LessThan => "<",
        }
    }
}

/// How per-condition results combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// Single filter clause as edited in the filter form.
///
/// Every field except `id` may be unset while the user is mid-edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<FilterKind>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub operator: Option<ComparisonOperator>,
    #[serde(default)]
    pub rating: Option<u8>,
}

impl FilterCondition {
    pub fn methodology(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::tag(id, FilterKind::Methodology, value)
    }

    pub fn function(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::tag(id, FilterKind::Function, value)
    }

    pub fn criteria(
        id: impl Into<String>,
        criterion_id: impl Into<String>,
        operator: ComparisonOperator,
        rating: u8,
    ) -> Self {
        Self {
            id: id.into(),
            kind: Some(FilterKind::Criteria),
            value: Some(criterion_id.into()),
            operator: Some(operator),
            rating: Some(rating),
        }
    }

    fn tag(id: impl Into<String>, kind: FilterKind, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind),
            value: Some(value.into()),
            operator: None,
            rating: None,
        }
    }
}
