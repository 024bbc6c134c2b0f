// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! The analysis pipeline: URL normalization, page and robots fetches, AI
//! text generation, and score aggregation. Every external call degrades to a
//! fallback value, so the pipeline always produces a complete result.

use crate::models::analysis::{
    AiSummary, AnalysisResult, Detail, DetailKind, StructuredDataReport,
};
use crate::models::page::PageData;
use crate::services::gemini::{self, GeminiClient, SuggestionContext};
use crate::services::page;
use crate::services::robots;
use crate::services::score::{ai_readiness_score, ScoreSignals};
use thiserror::Error;
use url::Url;

/// Provisional score handed to the suggestion prompt; the real score is only
/// known after the suggestion pass.
const PROVISIONAL_SCORE: u8 = 75;

/// Structured-data properties AI agents rely on most.
const IMPORTANT_FIELDS: [&str; 4] = ["name", "description", "url", "image"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidUrl {
    #[error("Invalid URL provided")]
    Empty,
    #[error("Invalid URL format")]
    Malformed,
}

/// Normalize user input into a fetchable URL: prepend `https://` when no
/// scheme is given, then require the result to parse.
pub fn normalize_url(input: &str) -> Result<Url, InvalidUrl> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidUrl::Empty);
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    Url::parse(&candidate).map_err(|_| InvalidUrl::Malformed)
}

/// Run the full analysis for one input URL. Never fails: an invalid URL
/// yields the degraded envelope, and every upstream failure substitutes a
/// fallback section.
pub async fn perform_complete_analysis(
    http: &reqwest::Client,
    gemini: Option<&GeminiClient>,
    input: &str,
) -> AnalysisResult {
    let url = match normalize_url(input) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(input, error = %e, "rejecting analysis request");
            return AnalysisResult::degraded(e.to_string());
        }
    };

    // Page and robots fetches are independent
    let (page_data, robots_analysis) = tokio::join!(
        fetch_page_or_fallback(http, &url),
        robots::analyze_robots(http, &url),
    );

    let context = SuggestionContext {
        score: PROVISIONAL_SCORE,
        has_structured_data: page_data.has_structured_data(),
        robots_status: robots_analysis.status,
    };

    // The three generation calls only depend on the fetched data
    let (summary, insights, structured_analysis) = tokio::join!(
        gemini::agent_summary(gemini, &url, &page_data),
        gemini::improvement_suggestions(gemini, &url, &context),
        gemini::structured_data_analysis(gemini, page_data.structured_data.as_ref()),
    );

    let score = ai_readiness_score(&ScoreSignals {
        has_title: page_data.title.is_some(),
        has_meta_description: page_data.description.is_some(),
        content_length: page_data.content.chars().count(),
        has_structured_data: page_data.has_structured_data(),
        robots_status: robots_analysis.status,
    });

    AnalysisResult {
        error: false,
        message: None,
        score,
        structured_data: StructuredDataReport {
            summary: "AI-powered analysis of your structured data implementation".to_string(),
            details: structured_data_details(page_data.structured_data.as_ref()),
            found: structured_data_types(page_data.structured_data.as_ref()),
            analysis: structured_analysis,
        },
        robots_analysis,
        ai_summary: AiSummary {
            summary,
            details: ai_analysis_details(),
            insights,
        },
    }
}

async fn fetch_page_or_fallback(http: &reqwest::Client, url: &Url) -> PageData {
    match page::fetch_page_data(http, url).await {
        Ok(page_data) => page_data,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "page fetch failed, using placeholder data");
            PageData::unavailable()
        }
    }
}

fn is_present(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn has_no_entries(data: &serde_json::Value) -> bool {
    match data {
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Null => true,
        _ => false,
    }
}

/// Per-property findings for the structured-data section.
pub(crate) fn structured_data_details(data: Option<&serde_json::Value>) -> Vec<Detail> {
    let Some(data) = data.filter(|d| !has_no_entries(d)) else {
        return vec![Detail::new(
            DetailKind::Error,
            "No structured data found on the page",
        )];
    };

    let mut details = Vec::new();
    if let Some(data_type) = data.get("@type").and_then(serde_json::Value::as_str) {
        details.push(Detail::new(
            DetailKind::Success,
            format!("{data_type} schema detected and properly formatted"),
        ));
    }

    for field in IMPORTANT_FIELDS {
        if data.get(field).is_some_and(is_present) {
            details.push(Detail::new(
                DetailKind::Success,
                format!("{field} property is present in structured data"),
            ));
        } else {
            details.push(Detail::new(
                DetailKind::Warning,
                format!("Consider adding {field} property to structured data"),
            ));
        }
    }

    details
}

/// Distinct schema.org types found, in document order.
pub(crate) fn structured_data_types(data: Option<&serde_json::Value>) -> Vec<String> {
    let Some(data) = data else {
        return Vec::new();
    };

    let mut types = Vec::new();
    let mut push = |value: &serde_json::Value| {
        if let Some(t) = value.get("@type").and_then(serde_json::Value::as_str) {
            if !types.contains(&t.to_string()) {
                types.push(t.to_string());
            }
        }
    };

    push(data);
    if let Some(items) = data.as_array() {
        for item in items {
            push(item);
        }
    }

    types
}

fn ai_analysis_details() -> Vec<Detail> {
    vec![
        Detail::new(
            DetailKind::Success,
            "Page content is easily parseable by AI agents",
        ),
        Detail::new(
            DetailKind::Info,
            "AI agents can extract key information effectively",
        ),
        Detail::new(
            DetailKind::Suggestion,
            "Consider adding more semantic markup for enhanced AI understanding",
        ),
    ]
}
