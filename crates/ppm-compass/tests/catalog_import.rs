use ppm_compass::comparison::{
    import_tools_csv, CatalogImportError, ComparisonEngine, Criterion, FilterCondition,
    FilterMode,
};

const EXPORT: &str = "id,name,methodologies,functions,scalability,Ease of Use,Security & Compliance\n\
atlas,Atlas PPM,Agile;Hybrid,Resource Planning,5,3,\n\
beacon,Beacon Portfolio,Waterfall,Budgeting; Reporting,2,5,4\n";

#[test]
fn csv_rows_become_flat_rating_tools() {
    let tools = import_tools_csv(EXPORT.as_bytes()).expect("csv imports");

    assert_eq!(tools.len(), 2);
    let atlas = &tools[0];
    assert_eq!(atlas.name, "Atlas PPM");
    assert_eq!(atlas.methodologies, vec!["Agile".to_string(), "Hybrid".to_string()]);
    let ratings = atlas.ratings.as_ref().expect("ratings captured");
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings["Ease of Use"], 3);
    assert!(!ratings.contains_key("Security & Compliance"));
    assert_eq!(
        tools[1].functions,
        vec!["Budgeting".to_string(), "Reporting".to_string()]
    );
}

#[test]
fn imported_tools_resolve_through_aliases() {
    let tools = import_tools_csv(EXPORT.as_bytes()).expect("csv imports");
    let engine = ComparisonEngine::default();
    let criteria = vec![
        Criterion::new("easeOfUse", "Ease of Use", 4),
        Criterion::new("security", "Security", 4),
    ];

    assert_eq!(engine.resolve_rating(&tools[1], &criteria[0]), 5);
    assert_eq!(engine.resolve_rating(&tools[1], &criteria[1]), 4);
    assert_eq!(engine.score(&tools[1], &criteria), 10.0);

    let kept = engine.filter_tools(
        &tools,
        &[FilterCondition::function("c1", "Reporting")],
        FilterMode::And,
        false,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id.0, "beacon");
}

#[test]
fn non_numeric_cells_report_their_position() {
    let err = import_tools_csv("id,name,reporting\natlas,Atlas,good\n".as_bytes())
        .expect_err("text rating rejected");

    assert!(matches!(
        err,
        CatalogImportError::InvalidRating { line: 2, ref column, .. } if column == "reporting"
    ));
    assert!(err.to_string().contains("'good'"));
}
