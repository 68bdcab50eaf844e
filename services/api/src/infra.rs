use metrics_exporter_prometheus::PrometheusHandle;
use ppm_compass::comparison::{
    AliasTable, ComparisonEngine, ComparisonOperator, CriterionId, FilterCondition, FilterMode,
    RATING_MAX, RATING_MIN,
};
use ppm_compass::config::MatchingConfig;
use ppm_compass::error::AppError;
use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Longest symbols first so `>=` is not read as `>`.
const OPERATORS: [(&str, ComparisonOperator); 5] = [
    (">=", ComparisonOperator::AtLeast),
    ("<=", ComparisonOperator::AtMost),
    (">", ComparisonOperator::GreaterThan),
    ("<", ComparisonOperator::LessThan),
    ("=", ComparisonOperator::Equal),
];

/// `criterion=rating` pair passed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RatingOverride {
    pub(crate) criterion: CriterionId,
    pub(crate) rating: u8,
}

pub(crate) fn build_engine(config: &MatchingConfig) -> Result<ComparisonEngine, AppError> {
    let mut aliases = AliasTable::builtin();
    if let Some(path) = &config.alias_file {
        let file = File::open(path)?;
        let extra = AliasTable::from_json_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            criteria = extra.len(),
            "merged criterion aliases"
        );
        aliases.extend(extra);
    }

    Ok(ComparisonEngine::new(aliases, config.filter_rating_source))
}

/// Parses `Methodology=<name>`, `Function=<name>` or `<criterion><op><rating>`.
///
/// The raw expression doubles as the condition id, so repeating an
/// expression replaces rather than duplicates it.
pub(crate) fn parse_condition(raw: &str) -> Result<FilterCondition, String> {
    let expression = raw.trim();

    if let Some((field, value)) = expression.split_once('=') {
        let value = value.trim();
        match field.trim().to_ascii_lowercase().as_str() {
            "methodology" => return Ok(FilterCondition::methodology(expression, value)),
            "function" => return Ok(FilterCondition::function(expression, value)),
            _ => {}
        }
    }

    let (criterion, operator, rating) = OPERATORS
        .iter()
        .find_map(|(symbol, operator)| {
            expression
                .split_once(symbol)
                .map(|(left, right)| (left.trim(), *operator, right.trim()))
        })
        .ok_or_else(|| {
            format!(
                "'{raw}' is not a filter; use Methodology=<name>, Function=<name> \
                 or <criterion><op><rating>"
            )
        })?;

    if criterion.is_empty() {
        return Err(format!("'{raw}' names no criterion"));
    }
    let rating = parse_rating(rating)?;

    Ok(FilterCondition::criteria(
        expression, criterion, operator, rating,
    ))
}

pub(crate) fn parse_rating_override(raw: &str) -> Result<RatingOverride, String> {
    let (criterion, rating) = raw
        .split_once('=')
        .ok_or_else(|| format!("'{raw}' must look like <criterion>=<rating>"))?;
    let criterion = criterion.trim();
    if criterion.is_empty() {
        return Err(format!("'{raw}' names no criterion"));
    }

    Ok(RatingOverride {
        criterion: CriterionId::from(criterion),
        rating: parse_rating(rating.trim())?,
    })
}

pub(crate) fn parse_mode(raw: &str) -> Result<FilterMode, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "and" => Ok(FilterMode::And),
        "or" => Ok(FilterMode::Or),
        other => Err(format!("unknown filter mode '{other}' (expected 'and' or 'or')")),
    }
}

fn parse_rating(raw: &str) -> Result<u8, String> {
    raw.parse::<u8>()
        .ok()
        .filter(|rating| (RATING_MIN..=RATING_MAX).contains(rating))
        .ok_or_else(|| format!("rating '{raw}' must be a whole number from 1 to 5"))
}
