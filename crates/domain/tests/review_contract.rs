//! Contract tests binding the prompt templates to the markdown parser.
//!
//! The fixture is a realistic model response for a Python binary-search
//! review. If the prompt format or the parser drifts, these tests catch
//! the mismatch before a real model response does.

use rstest::{fixture, rstest};

use domain::services::{build_knowledge_prompt, build_system_prompt, parse_review_markdown};
use domain::{Category, Knowledge, Severity, StructuredReviewResult};

const GOLDEN_RESPONSE: &str = include_str!("fixtures/review_response.md");

#[fixture]
fn golden() -> StructuredReviewResult {
    parse_review_markdown(GOLDEN_RESPONSE)
}

#[rstest]
fn golden_good_points_extracted(golden: StructuredReviewResult) {
    assert_eq!(golden.good_points.len(), 3);
    assert_eq!(
        golden.good_points[0],
        "二分探索の基本的なロジックが正しく実装されています"
    );
    assert_eq!(golden.good_points[2], "テストケースが含まれています");
}

#[rstest]
fn golden_improvements_classified(golden: StructuredReviewResult) {
    assert_eq!(golden.improvements.len(), 3);

    let overflow = &golden.improvements[0];
    assert_eq!(overflow.title, "オーバーフロー脆弱性の修正");
    assert_eq!(overflow.severity, Severity::High);
    assert!(overflow.description.contains("整数オーバーフロー"));
    assert!(overflow
        .code_after
        .as_deref()
        .unwrap()
        .contains("low + (high - low)"));

    let error_handling = &golden.improvements[1];
    assert_eq!(error_handling.title, "エラーハンドリングの改善");
    assert_eq!(error_handling.severity, Severity::High);
    assert!(error_handling
        .code_after
        .as_deref()
        .unwrap()
        .contains("raise ValueError"));

    let coverage = &golden.improvements[2];
    assert_eq!(coverage.title, "テストカバレッジの向上");
    assert_eq!(coverage.severity, Severity::Medium);
    assert!(coverage
        .code_after
        .as_deref()
        .unwrap()
        .starts_with("def test_binary_search_empty"));
}

#[rstest]
fn golden_summary_extracted(golden: StructuredReviewResult) {
    assert!(golden.summary.contains("正しく実装"));
    assert!(golden.summary.ends_with("改善の余地があります。"));
}

#[rstest]
fn parsing_is_deterministic(golden: StructuredReviewResult) {
    assert_eq!(golden, parse_review_markdown(GOLDEN_RESPONSE));
}

#[rstest]
fn descriptions_exclude_labels_and_code(golden: StructuredReviewResult) {
    for improvement in &golden.improvements {
        assert!(!improvement.description.contains("改善例"));
        assert!(!improvement.description.contains("```"));
        assert!(!improvement.description.is_empty());
    }
}

/// A response shaped exactly like the format example in the system
/// prompt must parse into the structure the example promises.
#[test]
fn format_example_round_trips_through_parser() {
    let response = "### 良い点\n- 良い点1\n- 良い点2\n\n### 1. 改善点のタイトル\n\n- 問題点の説明\n- 理由の説明\n\n改善例：\n```python\n# 改善後のコード\n```\n\n### 総合評価\n総合的な評価を1-2文で記述";

    let result = parse_review_markdown(response);
    assert_eq!(result.good_points, vec!["良い点1", "良い点2"]);
    assert_eq!(result.improvements.len(), 1);
    assert_eq!(result.improvements[0].title, "改善点のタイトル");
    assert_eq!(result.improvements[0].description, "問題点の説明\n理由の説明");
    assert_eq!(
        result.improvements[0].code_after.as_deref(),
        Some("# 改善後のコード")
    );
    assert_eq!(result.summary, "総合的な評価を1-2文で記述");
}

#[test]
fn knowledge_block_lands_in_system_prompt() {
    let knowledge = Knowledge::new(
        "user-1",
        "マジックナンバー禁止",
        "定数は名前を付けて宣言すること",
        Category::CleanCode,
        5,
    )
    .unwrap();

    let prompt = build_knowledge_prompt(vec![knowledge]);
    let system = build_system_prompt(&prompt.text);

    assert!(system.contains("### [クリーンコード] マジックナンバー禁止"));
    assert!(system.contains("定数は名前を付けて宣言すること"));
    assert_eq!(prompt.used.len(), 1);
}
