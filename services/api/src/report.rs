use crate::infra::{
    build_engine, parse_condition, parse_mode, parse_rating_override, RatingOverride,
};
use chrono::{DateTime, Utc};
use clap::Args;
use ppm_compass::comparison::{
    default_criteria, import_tools_csv, Catalog, ComparisonEngine, ComparisonOperator,
    ComparisonSession, CriterionId, FilterCondition, FilterKind, FilterMode, RankedTool,
    ScoreTier, ToolId,
};
use ppm_compass::config::AppConfig;
use ppm_compass::error::AppError;
use ppm_compass::telemetry;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON catalog with `criteria` and `tools` arrays
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Flat CSV export (id,name,methodologies,functions,<rating columns>) to add tools from
    #[arg(long)]
    pub(crate) tools_csv: Option<PathBuf>,
    /// Override a criterion's importance, e.g. `--rating security=5`
    #[arg(long = "rating", value_parser = parse_rating_override)]
    pub(crate) ratings: Vec<RatingOverride>,
    /// Filter such as `Methodology=Agile`, `Function=Budgeting` or `security>=4`
    #[arg(long = "filter", value_parser = parse_condition)]
    pub(crate) filters: Vec<FilterCondition>,
    /// How filters combine: `and` or `or`
    #[arg(long, default_value = "and", value_parser = parse_mode)]
    pub(crate) mode: FilterMode,
    /// Set a criterion aside before scoring (at least three must stay active)
    #[arg(long = "drop-criterion")]
    pub(crate) drop_criteria: Vec<String>,
    /// Set a tool aside before ranking
    #[arg(long = "drop-tool")]
    pub(crate) drop_tools: Vec<String>,
    /// Bring back tools the catalog marks as removed
    #[arg(long)]
    pub(crate) include_removed: bool,
    /// Only show the top N tools
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Emit the report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print where each tool rating was found
    #[arg(long)]
    pub(crate) trace: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CriterionWeight {
    pub(crate) id: CriterionId,
    pub(crate) name: String,
    pub(crate) user_rating: u8,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RankReport {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) source: String,
    pub(crate) criteria: Vec<CriterionWeight>,
    pub(crate) conditions: Vec<String>,
    pub(crate) mode: FilterMode,
    pub(crate) evaluated: usize,
    pub(crate) results: Vec<RankedTool>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let engine = build_engine(&config.matching)?;

    let (catalog, source) = load_catalog(args.catalog.as_deref(), args.tools_csv.as_deref())?;
    let criteria = if catalog.criteria.is_empty() {
        default_criteria()
    } else {
        catalog.criteria
    };
    let mut session = ComparisonSession::new(criteria, catalog.tools);

    for RatingOverride { criterion, rating } in &args.ratings {
        session.criteria_mut().set_user_rating(criterion, *rating)?;
    }
    for id in &args.drop_criteria {
        session.criteria_mut().remove(&CriterionId::from(id.as_str()))?;
    }
    if args.include_removed {
        let removed: Vec<ToolId> = session
            .tools()
            .removed()
            .iter()
            .map(|tool| tool.id.clone())
            .collect();
        for id in &removed {
            session.tools_mut().restore(id)?;
        }
    }
    for id in &args.drop_tools {
        session.tools_mut().remove(&ToolId::from(id.as_str()))?;
    }
    for condition in args.filters {
        session.add_condition(condition);
    }
    session.set_mode(args.mode);

    let report = build_report(&session, &engine, source, args.limit);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_table(&report));
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let engine = build_engine(&config.matching)?;

    let catalog = Catalog::from_json_reader(SAMPLE_CATALOG.as_bytes())?;
    let mut session = ComparisonSession::new(catalog.criteria, catalog.tools);
    let source = "bundled sample catalog".to_string();

    println!("PPM tool comparison demo");
    println!(
        "{} tools selected, {} set aside by the catalog\n",
        session.tools().selected().len(),
        session.tools().removed().len()
    );

    if args.trace {
        println!("Where each rating came from:");
        print!("{}", render_resolution_trace(&session, &engine));
        println!();
    }

    println!("Step 1: rank against the catalog's criteria");
    print!("{}", render_table(&build_report(&session, &engine, source.clone(), None)));

    println!("\nStep 2: ease of use becomes a must-have (5)");
    session
        .criteria_mut()
        .set_user_rating(&CriterionId::from("easeOfUse"), 5)?;
    print!("{}", render_table(&build_report(&session, &engine, source.clone(), None)));

    println!("\nStep 3: only agile tools");
    session.add_condition(FilterCondition::methodology("agile", "Agile"));
    print!("{}", render_table(&build_report(&session, &engine, source.clone(), None)));

    println!("\nStep 4: agile tools OR anything with security rated 4+");
    session.add_condition(FilterCondition::criteria(
        "secure",
        "security",
        ComparisonOperator::AtLeast,
        4,
    ));
    session.set_mode(FilterMode::Or);
    print!("{}", render_table(&build_report(&session, &engine, source.clone(), None)));

    println!("\nStep 5: set Atlas PPM aside and clear the filters");
    session.tools_mut().remove(&ToolId::from("atlas-ppm"))?;
    session.clear_conditions();
    print!("{}", render_table(&build_report(&session, &engine, source, None)));

    println!("\nStep 6: trim the criteria list");
    let removable = ["security", "reporting", "flexibility", "integrations", "scalability"];
    for id in removable {
        match session.criteria_mut().remove(&CriterionId::from(id)) {
            Ok(()) => println!("- removed '{id}'"),
            Err(err) => {
                println!("- kept '{id}': {err}");
                break;
            }
        }
    }
    let active: Vec<&str> = session
        .criteria()
        .active()
        .iter()
        .map(|criterion| criterion.name.as_str())
        .collect();
    println!("Active criteria: {}", active.join(", "));

    Ok(())
}

fn load_catalog(
    catalog: Option<&Path>,
    tools_csv: Option<&Path>,
) -> Result<(Catalog, String), AppError> {
    let (mut loaded, mut source) = match (catalog, tools_csv) {
        (Some(path), _) => (Catalog::from_path(path)?, path.display().to_string()),
        (None, None) => (
            Catalog::from_json_reader(SAMPLE_CATALOG.as_bytes())?,
            "bundled sample catalog".to_string(),
        ),
        (None, Some(_)) => (Catalog::default(), String::new()),
    };

    if let Some(path) = tools_csv {
        let file = File::open(path)?;
        loaded.tools.extend(import_tools_csv(BufReader::new(file))?);
        if !source.is_empty() {
            source.push_str(" + ");
        }
        source.push_str(&path.display().to_string());
    }

    Ok((loaded, source))
}

pub(crate) fn build_report(
    session: &ComparisonSession,
    engine: &ComparisonEngine,
    source: String,
    limit: Option<usize>,
) -> RankReport {
    let mut results = session.recommendations(engine);
    if let Some(limit) = limit {
        results.truncate(limit);
    }

    RankReport {
        generated_at: Utc::now(),
        source,
        criteria: session
            .criteria()
            .active()
            .iter()
            .map(|criterion| CriterionWeight {
                id: criterion.id.clone(),
                name: criterion.name.clone(),
                user_rating: criterion.user_rating,
            })
            .collect(),
        conditions: session
            .conditions()
            .iter()
            .filter(|condition| condition.is_complete())
            .map(describe_condition)
            .collect(),
        mode: session.mode(),
        evaluated: session.tools().selected().len(),
        results,
    }
}

pub(crate) fn render_table(report: &RankReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ranking from {}", report.source);

    let weights: Vec<String> = report
        .criteria
        .iter()
        .map(|criterion| format!("{} {}", criterion.name, criterion.user_rating))
        .collect();
    let _ = writeln!(out, "Criteria: {}", weights.join(", "));

    if !report.conditions.is_empty() {
        let mode = match report.mode {
            FilterMode::And => "all of",
            FilterMode::Or => "any of",
        };
        let _ = writeln!(out, "Filters ({mode}): {}", report.conditions.join("; "));
    }

    if report.results.is_empty() {
        let _ = writeln!(
            out,
            "No tools match ({} evaluated).",
            report.evaluated
        );
        return out;
    }

    let width = report
        .results
        .iter()
        .map(|ranked| ranked.name.len())
        .max()
        .unwrap_or(0);
    for (position, ranked) in report.results.iter().enumerate() {
        let met = ranked
            .breakdown
            .contributions
            .iter()
            .filter(|contribution| contribution.meets_requirement())
            .count();
        let _ = writeln!(
            out,
            "{:>2}. {:<width$}  {:>4.1}  {:<6}  {met}/{} requirements met",
            position + 1,
            ranked.name,
            ranked.score,
            tier_label(ranked.tier),
            ranked.breakdown.contributions.len(),
        );
    }
    out
}

fn render_resolution_trace(session: &ComparisonSession, engine: &ComparisonEngine) -> String {
    let mut out = String::new();
    for tool in session.tools().selected() {
        let _ = writeln!(out, "{}", tool.name);
        for criterion in session.criteria().active() {
            let resolution = engine.resolver().resolve_traced(tool, criterion);
            let origin = match resolution.step {
                Some(step) => format!("{step:?}"),
                None => "unrated".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:<30} {}  ({origin})",
                criterion.name, resolution.rating
            );
        }
    }
    out
}

fn describe_condition(condition: &FilterCondition) -> String {
    let value = condition.value.as_deref().unwrap_or_default();
    match (condition.kind, condition.operator, condition.rating) {
        (Some(FilterKind::Methodology), _, _) => format!("methodology is {value}"),
        (Some(FilterKind::Function), _, _) => format!("function is {value}"),
        (Some(FilterKind::Criteria), Some(operator), Some(rating)) => {
            format!("{value} {} {rating}", operator.symbol())
        }
        _ => condition.id.clone(),
    }
}

fn tier_label(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::Best => "best",
        ScoreTier::Middle => "middle",
        ScoreTier::Low => "low",
    }
}
