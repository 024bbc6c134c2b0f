// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::robots::{RobotsAnalysis, RobotsStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Severity/category of a single analysis detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Success,
    Error,
    Warning,
    Info,
    Suggestion,
}

/// One human-readable finding within an analysis section.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Detail {
    #[serde(rename = "type")]
    pub kind: DetailKind,
    pub message: String,
}

impl Detail {
    pub fn new(kind: DetailKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Request body for the full analysis endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub url: String,
}

/// Structured-data section of the analysis result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataReport {
    pub summary: String,
    pub details: Vec<Detail>,
    /// schema.org types found on the page
    pub found: Vec<String>,
    pub analysis: String,
}

/// AI-generated section of the analysis result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub summary: String,
    pub details: Vec<Detail>,
    pub insights: Vec<String>,
}

/// Complete analysis for one URL. Created fresh per request, immutable once
/// returned, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Set only on the degraded envelope
    #[serde(default, skip_serializing_if = "is_false")]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// AI readiness score, 0-100
    pub score: u8,
    pub structured_data: StructuredDataReport,
    pub robots_analysis: RobotsAnalysis,
    pub ai_summary: AiSummary,
}

fn is_false(v: &bool) -> bool {
    !v
}

impl AnalysisResult {
    /// Best-effort envelope returned when the analysis cannot run at all
    /// (invalid URL). Still a renderable result shape, never a raw error.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: Some(message.into()),
            score: 0,
            structured_data: StructuredDataReport {
                summary: "Unable to analyze structured data".to_string(),
                details: vec![Detail::new(
                    DetailKind::Error,
                    "Analysis service temporarily unavailable",
                )],
                found: Vec::new(),
                analysis: "Service temporarily unavailable".to_string(),
            },
            robots_analysis: RobotsAnalysis {
                status: RobotsStatus::Error,
                summary: "Unable to analyze robots.txt".to_string(),
                details: vec![Detail::new(
                    DetailKind::Error,
                    "Analysis service temporarily unavailable",
                )],
                raw_content: String::new(),
            },
            ai_summary: AiSummary {
                summary: "Analysis service temporarily unavailable".to_string(),
                details: vec![Detail::new(DetailKind::Error, "Unable to generate AI analysis")],
                insights: Vec::new(),
            },
        }
    }
}
