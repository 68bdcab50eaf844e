use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::domain::{Criterion, RatingsMap, Tool, RATING_MAX};

const ID_COLUMN: &str = "id";
const NAME_COLUMN: &str = "name";
const METHODOLOGIES_COLUMN: &str = "methodologies";
const FUNCTIONS_COLUMN: &str = "functions";
const LIST_SEPARATOR: char = ';';

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tool CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("tool CSV is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("line {line}: '{value}' in column '{column}' is not a rating between 0 and 5")]
    InvalidRating {
        line: u64,
        column: String,
        value: String,
    },
}

/// Criteria and tools as handed over by the data-fetch layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub tools: Vec<Tool>,
}

impl Catalog {
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let mut catalog: Catalog = serde_json::from_reader(reader)?;
        for tool in &mut catalog.tools {
            tool.derive_tag_lists();
        }
        info!(
            criteria = catalog.criteria.len(),
            tools = catalog.tools.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogImportError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }
}

/// Reads tools from a flat CSV export.
///
/// Expected columns are `id`, `name`, optional `methodologies` and `functions`
/// (`;`-separated), and one column per rating key. Rating cells land in the
/// tool's `ratings` map under the column header; blank cells are skipped.
pub fn import_tools_csv<R: Read>(reader: R) -> Result<Vec<Tool>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let column = |name: &'static str| headers.iter().position(|header| header == name);
    let id_index = column(ID_COLUMN).ok_or(CatalogImportError::MissingColumn(ID_COLUMN))?;
    let name_index = column(NAME_COLUMN).ok_or(CatalogImportError::MissingColumn(NAME_COLUMN))?;
    let methodologies_index = column(METHODOLOGIES_COLUMN);
    let functions_index = column(FUNCTIONS_COLUMN);
    let fixed = [
        Some(id_index),
        Some(name_index),
        methodologies_index,
        functions_index,
    ];
    let rating_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| !fixed.contains(&Some(*index)))
        .map(|(index, header)| (index, header.to_string()))
        .collect();

    let mut tools = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let cell = |index: usize| record.get(index).unwrap_or("");

        let mut ratings = RatingsMap::new();
        for (index, header) in &rating_columns {
            let raw = cell(*index);
            if raw.is_empty() {
                continue;
            }
            let rating = raw
                .parse::<u8>()
                .ok()
                .filter(|rating| *rating <= RATING_MAX)
                .ok_or_else(|| CatalogImportError::InvalidRating {
                    line,
                    column: header.clone(),
                    value: raw.to_string(),
                })?;
            ratings.insert(header.clone(), Value::from(rating));
        }

        let mut tool = Tool::new(cell(id_index), cell(name_index));
        tool.methodologies = methodologies_index
            .map(|index| split_list(cell(index)))
            .unwrap_or_default();
        tool.functions = functions_index
            .map(|index| split_list(cell(index)))
            .unwrap_or_default();
        tool.ratings = Some(ratings);
        tools.push(tool);
    }

    info!(
        tools = tools.len(),
        rating_columns = rating_columns.len(),
        "imported tools from CSV"
    );
    Ok(tools)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
