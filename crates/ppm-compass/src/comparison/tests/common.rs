use axum::body::to_bytes;
use axum::response::Response;
use serde_json::{json, Value};

use crate::comparison::domain::{Criterion, RatingsMap, Tag, TagType, Tool, ToolCriterion};
use crate::comparison::ranking::ComparisonEngine;

pub(super) fn engine() -> ComparisonEngine {
    ComparisonEngine::default()
}

pub(super) fn criterion(id: &str, name: &str, user_rating: u8) -> Criterion {
    Criterion::new(id, name, user_rating)
}

/// Tool rated through its `criteria` array.
pub(super) fn curated_tool(id: &str, ratings: &[(&str, &str, u8)]) -> Tool {
    let mut tool = Tool::new(id, id.to_uppercase());
    tool.criteria = Some(
        ratings
            .iter()
            .map(|(criterion_id, name, ranking)| ToolCriterion::new(*criterion_id, *name, *ranking))
            .collect(),
    );
    tool
}

/// Tool rated only through the flat `ratings` map.
pub(super) fn flat_tool(id: &str, ratings: &[(&str, Value)]) -> Tool {
    let mut tool = Tool::new(id, id.to_uppercase());
    tool.ratings = Some(
        ratings
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect::<RatingsMap>(),
    );
    tool
}

pub(super) fn tagged_tool(id: &str, methodologies: &[&str], functions: &[&str]) -> Tool {
    let mut tool = Tool::new(id, id.to_uppercase());
    tool.tags = methodologies
        .iter()
        .map(|name| Tag::new(format!("m-{name}"), *name, TagType::Methodology))
        .chain(
            functions
                .iter()
                .map(|name| Tag::new(format!("f-{name}"), *name, TagType::Function)),
        )
        .collect();
    tool.derive_tag_lists();
    tool
}

pub(super) fn sample_tools() -> Vec<Tool> {
    let mut atlas = tagged_tool("atlas", &["Agile", "Waterfall"], &["Resource Planning"]);
    atlas.ratings = Some(RatingsMap::from_iter([
        ("scalability".to_string(), json!(5)),
        ("security".to_string(), json!(4)),
    ]));

    let mut beacon = tagged_tool("beacon", &["Waterfall"], &["Budgeting"]);
    beacon.ratings = Some(RatingsMap::from_iter([
        ("scalability".to_string(), json!(2)),
        ("security".to_string(), json!(5)),
    ]));

    let mut comet = tagged_tool("comet", &["Agile"], &["Budgeting", "Resource Planning"]);
    comet.criteria = Some(vec![ToolCriterion::new("scalability", "Scalability", 4)]);
    comet.removed = Some(true);

    vec![atlas, beacon, comet]
}

pub(super) fn ids(tools: &[Tool]) -> Vec<&str> {
    tools.iter().map(|tool| tool.id.0.as_str()).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
