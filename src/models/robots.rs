// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::analysis::{Detail, DetailKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// The AI crawlers whose access is evaluated against robots.txt.
pub const AI_CRAWLERS: [&str; 4] = ["GPTBot", "PerplexityBot", "GoogleBot", "BingBot"];

/// Kind of a single robots.txt rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Allow,
    Disallow,
}

/// One `Allow:` or `Disallow:` line, attributed to a user-agent group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsRule {
    pub kind: RuleKind,
    pub path_prefix: String,
}

/// Parsed robots.txt: user-agent token (case-sensitive, `*` = wildcard) to
/// its ordered rule list. Built once per fetch, immutable afterwards.
#[derive(Debug, Default, Clone)]
pub struct RobotsRuleSet {
    groups: HashMap<String, Vec<RobotsRule>>,
}

impl RobotsRuleSet {
    pub fn push_rule(&mut self, agent: &str, rule: RobotsRule) {
        self.groups.entry(agent.to_string()).or_default().push(rule);
    }

    pub fn rules_for(&self, agent: &str) -> Option<&[RobotsRule]> {
        self.groups.get(agent).map(Vec::as_slice)
    }

    /// Rules that apply to `agent`: its own group, else the wildcard group,
    /// else no rules (implicitly allowed).
    pub fn effective_rules(&self, agent: &str) -> &[RobotsRule] {
        self.rules_for(agent)
            .or_else(|| self.rules_for("*"))
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Resolved permission for one crawler from the fixed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlerPermission {
    pub crawler: &'static str,
    pub allowed: bool,
}

/// Outcome category of a robots.txt analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RobotsStatus {
    MostlyAllowed,
    MostlyBlocked,
    NotFound,
    CorsBlocked,
    Timeout,
    Error,
}

impl RobotsStatus {
    /// Wire-format name, as used in prompts and summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            RobotsStatus::MostlyAllowed => "mostly_allowed",
            RobotsStatus::MostlyBlocked => "mostly_blocked",
            RobotsStatus::NotFound => "not_found",
            RobotsStatus::CorsBlocked => "cors_blocked",
            RobotsStatus::Timeout => "timeout",
            RobotsStatus::Error => "error",
        }
    }
}

/// Robots.txt analysis as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotsAnalysis {
    pub status: RobotsStatus,
    pub summary: String,
    pub details: Vec<Detail>,
    #[serde(default)]
    pub raw_content: String,
}

impl RobotsAnalysis {
    /// Payload for a site without robots.txt. Crawlers fall back to default
    /// permissions, which still earns a partial score.
    pub fn not_found() -> Self {
        Self {
            status: RobotsStatus::NotFound,
            summary: "No robots.txt file found. AI crawlers will use default permissions."
                .to_string(),
            details: vec![
                Detail::new(DetailKind::Warning, "No robots.txt file detected"),
                Detail::new(DetailKind::Info, "AI crawlers will assume default permissions"),
                Detail::new(
                    DetailKind::Suggestion,
                    "Consider adding robots.txt for explicit crawler control",
                ),
            ],
            raw_content: String::new(),
        }
    }

    pub fn timeout() -> Self {
        Self {
            status: RobotsStatus::Timeout,
            summary: "Request timed out while fetching robots.txt.".to_string(),
            details: vec![
                Detail::new(DetailKind::Warning, "Request took too long to complete"),
                Detail::new(DetailKind::Info, "Site may be slow or temporarily unavailable"),
                Detail::new(DetailKind::Suggestion, "Try again later or check site availability"),
            ],
            raw_content: String::new(),
        }
    }

    /// Payload for connection-level failures (refused, DNS, TLS). The
    /// browser-era status name is kept for wire compatibility.
    pub fn network_blocked() -> Self {
        Self {
            status: RobotsStatus::CorsBlocked,
            summary: "Unable to access robots.txt due to network restrictions.".to_string(),
            details: vec![
                Detail::new(DetailKind::Warning, "Connection to the site was blocked or refused"),
                Detail::new(
                    DetailKind::Info,
                    "This is a common limitation when analyzing external sites",
                ),
                Detail::new(
                    DetailKind::Suggestion,
                    "Verify the site is reachable and accepts direct connections",
                ),
            ],
            raw_content: String::new(),
        }
    }

    /// Generic fallback when the fetch or parse failed for any other reason.
    pub fn unavailable() -> Self {
        Self {
            status: RobotsStatus::Error,
            summary: "Unable to analyze robots.txt file.".to_string(),
            details: vec![
                Detail::new(DetailKind::Error, "Failed to fetch or parse robots.txt"),
                Detail::new(DetailKind::Info, "Analysis will continue with default assumptions"),
                Detail::new(
                    DetailKind::Suggestion,
                    "Ensure robots.txt is accessible and properly formatted",
                ),
            ],
            raw_content: String::new(),
        }
    }
}

/// Response of the raw robots.txt proxy endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotsTextResponse {
    pub robots_text: String,
}
