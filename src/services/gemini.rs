// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Gemini REST client and the deterministic fallback texts used whenever the
//! generative service is unavailable. Callers never see a hard error from
//! this module: every operation degrades to fallback output.

use crate::models::page::PageData;
use crate::models::robots::RobotsStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Maximum number of improvement suggestions returned to the client.
const MAX_SUGGESTIONS: usize = 7;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("model returned no text")]
    EmptyResponse,
}

/// Thin client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build a client from `GEMINI_API_KEY`. A missing or empty key returns
    /// `None`; the analysis then runs on fallback text.
    pub fn from_env(http: reqwest::Client) -> Option<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(Self::new(http, key)),
            _ => {
                tracing::warn!("{API_KEY_ENV} not set, analysis will use fallback text");
                None
            }
        }
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Single-prompt text generation.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, MODEL, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Analysis context passed to the suggestion generator.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionContext {
    pub score: u8,
    pub has_structured_data: bool,
    pub robots_status: RobotsStatus,
}

/// How an AI agent would interpret and describe the page.
pub async fn agent_summary(client: Option<&GeminiClient>, url: &Url, page: &PageData) -> String {
    let Some(client) = client else {
        return fallback_analysis(url, page);
    };
    match client.generate(&summary_prompt(url, page)).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "agent summary generation failed, using fallback");
            fallback_analysis(url, page)
        }
    }
}

/// 5-7 actionable recommendations for improving AI-agent visibility.
pub async fn improvement_suggestions(
    client: Option<&GeminiClient>,
    url: &Url,
    context: &SuggestionContext,
) -> Vec<String> {
    let Some(client) = client else {
        return fallback_suggestions(context);
    };
    match client.generate(&suggestions_prompt(url, context)).await {
        Ok(text) => parse_suggestions(&text),
        Err(e) => {
            tracing::warn!(error = %e, "suggestion generation failed, using fallback");
            fallback_suggestions(context)
        }
    }
}

/// Free-text assessment of the page's structured data.
pub async fn structured_data_analysis(
    client: Option<&GeminiClient>,
    data: Option<&serde_json::Value>,
) -> String {
    let Some(client) = client else {
        return fallback_structured_data_analysis(data);
    };
    match client.generate(&structured_data_prompt(data)).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "structured data analysis failed, using fallback");
            fallback_structured_data_analysis(data)
        }
    }
}

fn summary_prompt(url: &Url, page: &PageData) -> String {
    format!(
        "Act as an AI agent (like ChatGPT, Perplexity, or Gemini) and describe how you would \
         interpret and summarize this webpage:\n\n\
         URL: {url}\n\
         Page Title: {}\n\
         Meta Description: {}\n\
         Main Content: {}\n\
         Key Elements: {}\n\n\
         Provide a natural, conversational summary that shows exactly how an AI agent would \
         describe this page to a user who asked about it. Focus on what the page is about, the \
         key information available, its main purpose, and important details or features. Write \
         as if you're directly answering a user's question about this website.",
        page.title.as_deref().unwrap_or("Not provided"),
        page.description.as_deref().unwrap_or("Not provided"),
        if page.content.is_empty() { "Not provided" } else { page.content.as_str() },
        if page.key_elements.is_empty() {
            "Not provided".to_string()
        } else {
            page.key_elements.join(", ")
        },
    )
}

fn suggestions_prompt(url: &Url, context: &SuggestionContext) -> String {
    format!(
        "Based on the following website analysis, provide specific, actionable suggestions to \
         improve AI agent visibility:\n\n\
         URL: {url}\n\
         Current Score: {}\n\
         Structured Data: {}\n\
         Robots.txt Status: {}\n\n\
         Please provide 5-7 specific, actionable recommendations that would help this website \
         be better understood by AI agents, improve its structured data, enhance its content \
         for AI parsing, optimize AI crawler access, and increase its overall AI readiness \
         score. Format each suggestion as a clear, actionable item without numbering.",
        context.score,
        if context.has_structured_data { "Present" } else { "Missing" },
        context.robots_status.as_str(),
    )
}

fn structured_data_prompt(data: Option<&serde_json::Value>) -> String {
    let rendered = data
        .and_then(|d| serde_json::to_string_pretty(d).ok())
        .unwrap_or_else(|| "None detected".to_string());
    format!(
        "Analyze the following structured data and provide insights for AI optimization:\n\n\
         Structured Data Found: {rendered}\n\n\
         Please assess the current structured data quality, name missing structured data types \
         that would improve AI understanding, and give specific implementation recommendations \
         with a priority for each. Focus on schema.org types that are most valuable for AI \
         agents."
    )
}

/// Split model output into cleaned suggestion lines: drop blanks, numbered
/// headings and short fragments, strip bullet markers, cap the count.
pub(crate) fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_numbered(line) && line.len() > 20)
        .map(strip_bullet)
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with('.')
}

fn strip_bullet(line: &str) -> String {
    line.trim_start_matches(['-', '•', '*']).trim_start().to_string()
}

/// Deterministic page summary built from the extracted signals.
pub(crate) fn fallback_analysis(url: &Url, page: &PageData) -> String {
    let domain = url.host_str().unwrap_or_default();
    format!(
        "This webpage from {domain} appears to be {} and {}. {} The content appears to be {} \
         in scope. AI agents would be able to extract key information from this page, though \
         optimization opportunities exist to improve discoverability and understanding.",
        if page.title.is_some() {
            "well-structured with a clear title"
        } else {
            "missing a proper title"
        },
        if page.description.is_some() {
            "includes a meta description"
        } else {
            "lacks a meta description"
        },
        if page.has_structured_data() {
            "The page implements structured data which helps AI agents understand the content better."
        } else {
            "The page would benefit from structured data implementation to improve AI agent understanding."
        },
        if page.content.chars().count() > 500 { "comprehensive" } else { "moderate" },
    )
}

pub(crate) fn fallback_suggestions(context: &SuggestionContext) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !context.has_structured_data {
        suggestions.push("Implement structured data markup using schema.org vocabulary");
        suggestions.push("Add FAQ schema to improve question-answering capabilities");
        suggestions.push("Include breadcrumb navigation with structured data");
    }
    if context.robots_status == RobotsStatus::MostlyBlocked {
        suggestions.push("Ensure robots.txt allows AI crawler access to important content");
    }
    suggestions.push("Add comprehensive meta descriptions to improve AI agent summaries");
    suggestions.push("Optimize page titles with descriptive, keyword-rich content");
    suggestions.push("Optimize heading structure (H1, H2, H3) for better content hierarchy");

    suggestions
        .into_iter()
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}

pub(crate) fn fallback_structured_data_analysis(data: Option<&serde_json::Value>) -> String {
    let data = match data {
        Some(serde_json::Value::Object(map)) if !map.is_empty() => map,
        _ => {
            return "No structured data detected on this page. Implementing basic schema.org \
                    markup would significantly improve AI agent understanding. Consider adding \
                    WebPage, Organization, or Article schema depending on your content type. \
                    Priority recommendations include adding JSON-LD structured data for better \
                    parsing by AI agents."
                .to_string();
        }
    };

    let data_type = data
        .get("@type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Unknown");
    format!(
        "Current structured data implementation includes {data_type} schema, which provides a \
         good foundation for AI understanding. The existing markup helps AI agents identify key \
         page elements and context. Consider expanding the schema with additional properties \
         like description, image, and relevant business information. Adding FAQ or HowTo schema \
         could further enhance AI agent comprehension and improve question-answering \
         capabilities."
    )
}
