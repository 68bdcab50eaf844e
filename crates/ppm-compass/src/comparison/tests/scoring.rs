use serde_json::json;

use super::common::*;
use crate::comparison::domain::Tool;
use crate::comparison::score::{MatchScorer, ScoreTier, PERFECT_SCORE};

#[test]
fn averages_contributions_when_requirements_are_missed() {
    let scorer = MatchScorer::default();
    let tool = curated_tool(
        "atlas",
        &[("reporting", "Reporting", 5), ("security", "Security", 2)],
    );
    let criteria = vec![
        criterion("reporting", "Reporting", 4),
        criterion("security", "Security", 4),
    ];

    let breakdown = scorer.breakdown(&tool, &criteria);

    assert_eq!(breakdown.contributions[0].contribution, 9);
    assert_eq!(breakdown.contributions[1].contribution, 3);
    assert!(!breakdown.meets_all_requirements);
    assert_eq!(breakdown.score, 6.0);
    assert_eq!(ScoreTier::from_score(breakdown.score), ScoreTier::Middle);
}

#[test]
fn meeting_every_requirement_forces_perfect_score() {
    let scorer = MatchScorer::default();
    let tool = curated_tool(
        "atlas",
        &[("reporting", "Reporting", 4), ("security", "Security", 5)],
    );
    let criteria = vec![
        criterion("reporting", "Reporting", 3),
        criterion("security", "Security", 5),
    ];

    let breakdown = scorer.breakdown(&tool, &criteria);

    assert!(breakdown.meets_all_requirements);
    assert_eq!(breakdown.score, PERFECT_SCORE);
    let averaged: f64 = breakdown
        .contributions
        .iter()
        .map(|entry| f64::from(entry.contribution))
        .sum::<f64>()
        / 2.0;
    assert_eq!(averaged, 8.5);
}

#[test]
fn empty_criteria_scores_zero() {
    let scorer = MatchScorer::default();
    let tool = curated_tool("atlas", &[("reporting", "Reporting", 5)]);

    let breakdown = scorer.breakdown(&tool, &[]);

    assert_eq!(breakdown.score, 0.0);
    assert!(breakdown.contributions.is_empty());
    assert!(!breakdown.meets_all_requirements);
}

#[test]
fn unrated_criteria_are_penalised_not_skipped() {
    let scorer = MatchScorer::default();
    let tool = Tool::new("bare", "Bare");
    let criteria = vec![
        criterion("reporting", "Reporting", 1),
        criterion("security", "Security", 3),
    ];

    let breakdown = scorer.breakdown(&tool, &criteria);

    // 7 - 1*2 = 5 and 7 - 3*2 = 1
    assert_eq!(breakdown.score, 3.0);
    assert!(breakdown.contributions.iter().all(|entry| entry.source.is_none()));
}

#[test]
fn small_criteria_sets_are_accepted() {
    let scorer = MatchScorer::default();
    let tool = flat_tool("atlas", &[("Security", json!(1))]);

    let score = scorer.score(&tool, &[criterion("security", "Security", 5)]);

    assert_eq!(score, 0.0);
}

#[test]
fn score_is_bounded_and_exactly_ten_only_when_all_met() {
    let scorer = MatchScorer::default();
    let criteria = vec![
        criterion("scalability", "Scalability", 2),
        criterion("reporting", "Reporting", 4),
        criterion("security", "Security", 5),
    ];

    for scalability in 0..=5u8 {
        for reporting in 0..=5u8 {
            for security in 0..=5u8 {
                let tool = flat_tool(
                    "grid",
                    &[
                        ("scalability", json!(scalability)),
                        ("reporting", json!(reporting)),
                        ("security", json!(security)),
                    ],
                );
                let score = scorer.score(&tool, &criteria);
                let all_met = scalability >= 2 && reporting >= 4 && security >= 5;

                assert!((0.0..=10.0).contains(&score), "score {score} out of range");
                assert_eq!(score == PERFECT_SCORE, all_met);
                assert_eq!(score, scorer.score(&tool, &criteria));
            }
        }
    }
}

#[test]
fn repeated_scoring_yields_identical_results() {
    let scorer = MatchScorer::default();
    let tools = sample_tools();
    let criteria = vec![
        criterion("scalability", "Scalability", 4),
        criterion("security", "Security", 4),
    ];

    let first: Vec<f64> = tools.iter().map(|tool| scorer.score(tool, &criteria)).collect();
    let second: Vec<f64> = tools.iter().map(|tool| scorer.score(tool, &criteria)).collect();

    assert_eq!(first, vec![10.0, 6.0, 4.0]);
    assert_eq!(first, second);
    for tool in &tools {
        assert_eq!(
            scorer.breakdown(tool, &criteria),
            scorer.breakdown(tool, &criteria)
        );
    }
}
