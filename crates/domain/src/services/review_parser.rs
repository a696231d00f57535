//! Structured extraction from LLM review markdown.
//!
//! The model is asked to emit `### 良い点`, numbered `### N. <title>`
//! sections and `### 総合評価` in that order. Real responses drift, so
//! every extractor falls back to a placeholder instead of failing: a
//! malformed response still yields a usable result.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::{Improvement, StructuredReviewResult};
use crate::value_objects::Severity;

const DEFAULT_SUMMARY: &str = "詳細は下記をご確認ください。";
const DEFAULT_GOOD_POINT: &str = "コードの基本的な構造は良好です";
const DEFAULT_DESCRIPTION: &str = "改善が推奨されます";

static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"###+?\s*総合評価\s*\n([\s\S]*?)(?:\n##|$)").unwrap());
static GOOD_POINTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"###+?\s*良い点\s*\n([\s\S]*?)(?:\n##|$)").unwrap());
static IMPROVEMENT_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"###+?\s*(\d+)\.\s+(.+)\n").unwrap());
static SUMMARY_HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n###+?\s*総合評価").unwrap());
static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[a-z]*\n([\s\S]*?)```").unwrap());
static EXAMPLE_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^改善[例案][:：]").unwrap());

const HIGH_SEVERITY_KEYWORDS: &[&str] = &[
    "重大",
    "脆弱性",
    "エラーハンドリング",
    "エラー処理",
    "セキュリティ",
    "危険",
    "バグ",
    "クリティカル",
];

const MEDIUM_SEVERITY_KEYWORDS: &[&str] = &[
    "パフォーマンス",
    "効率",
    "最適化",
    "クリーンコード",
    "保守性",
    "可読性",
    "テスト",
    "ドキュメント",
];

/// Parse review markdown into its structured form. Never fails; missing
/// sections are replaced by placeholder text.
pub fn parse_review_markdown(markdown: &str) -> StructuredReviewResult {
    StructuredReviewResult {
        summary: extract_summary(markdown),
        good_points: extract_good_points(markdown),
        improvements: extract_improvements(markdown),
    }
}

fn extract_summary(markdown: &str) -> String {
    if let Some(caps) = SUMMARY_RE.captures(markdown) {
        let summary = caps[1].trim();
        if !summary.is_empty() {
            return summary.to_string();
        }
    }
    DEFAULT_SUMMARY.to_string()
}

fn extract_good_points(markdown: &str) -> Vec<String> {
    let mut points = Vec::new();
    if let Some(caps) = GOOD_POINTS_RE.captures(markdown) {
        for line in caps[1].lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix('-') {
                let point = rest.trim();
                if !point.is_empty() {
                    points.push(point.to_string());
                }
            }
        }
    }
    if points.is_empty() {
        points.push(DEFAULT_GOOD_POINT.to_string());
    }
    points
}

fn extract_improvements(markdown: &str) -> Vec<Improvement> {
    let headers: Vec<regex::Captures> = IMPROVEMENT_HEADER_RE.captures_iter(markdown).collect();
    let mut improvements = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let title = caps[2].trim().to_string();
        let body_start = caps.get(0).map(|m| m.end()).unwrap_or(0);
        // Body runs to the next numbered header, otherwise to the
        // summary section, otherwise to the end of the response.
        let body_end = match headers.get(i + 1) {
            Some(next) => next.get(0).map(|m| m.start()).unwrap_or(markdown.len()),
            None => SUMMARY_HEADER_RE
                .find(&markdown[body_start..])
                .map(|m| body_start + m.start())
                .unwrap_or(markdown.len()),
        };
        let body = &markdown[body_start..body_end];

        let description = extract_description(body);
        let severity = classify_severity(&title, &description);
        improvements.push(Improvement {
            title,
            description,
            code_after: extract_code_block(body),
            severity,
        });
    }

    improvements
}

/// Collect the bullet lines of an improvement body, skipping code block
/// contents, `改善例：`-style labels and blank lines.
fn extract_description(body: &str) -> String {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block {
            continue;
        }
        if EXAMPLE_LABEL_RE.is_match(trimmed) {
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('-') {
            lines.push(rest.trim().to_string());
        }
    }

    let description = lines.join("\n");
    if description.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        description
    }
}

fn extract_code_block(body: &str) -> Option<String> {
    let caps = CODE_BLOCK_RE.captures(body)?;
    let code = caps[1].trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

fn classify_severity(title: &str, description: &str) -> Severity {
    let text = format!("{title} {description}").to_lowercase();
    if HIGH_SEVERITY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return Severity::High;
    }
    if MEDIUM_SEVERITY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return Severity::Medium;
    }
    Severity::Low
}
