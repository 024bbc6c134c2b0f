// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Robots.txt directive parsing and AI-crawler permission evaluation.
//!
//! This is intentionally not a full robots-exclusion implementation: a
//! crawler counts as blocked only on an exact `Disallow: /` in its effective
//! group. Partial-path disallows never block.

use crate::models::analysis::{Detail, DetailKind};
use crate::models::robots::{
    CrawlerPermission, RobotsAnalysis, RobotsRule, RobotsRuleSet, RobotsStatus, RuleKind,
    AI_CRAWLERS,
};
use reqwest::header::ACCEPT;
use std::time::Duration;
use url::Url;

/// Budget for the robots.txt fetch. Everything past this degrades to the
/// timeout payload instead of blocking the analysis.
const ROBOTS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Match a directive name at the start of `line`, case-insensitively, and
/// return the trimmed value after the colon. The value is the whole remainder
/// of the line, so paths and agent tokens containing `:` survive intact.
fn directive_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let prefix = line.get(..name.len())?;
    if prefix.eq_ignore_ascii_case(name) {
        Some(line[name.len()..].trim())
    } else {
        None
    }
}

/// Parse raw robots.txt text into per-agent rule lists.
///
/// A single pass over trimmed lines, tracking the current user-agent context
/// (starting at `*`). Malformed or unknown lines are silently ignored.
/// Repeated `User-agent:` blocks for the same token accumulate rules.
pub fn parse_robots_txt(text: &str) -> RobotsRuleSet {
    let mut rules = RobotsRuleSet::default();
    let mut current_agent = "*".to_string();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if let Some(agent) = directive_value(line, "user-agent:") {
            current_agent = agent.to_string();
        } else if let Some(path) = directive_value(line, "disallow:") {
            rules.push_rule(
                &current_agent,
                RobotsRule {
                    kind: RuleKind::Disallow,
                    path_prefix: path.to_string(),
                },
            );
        } else if let Some(path) = directive_value(line, "allow:") {
            rules.push_rule(
                &current_agent,
                RobotsRule {
                    kind: RuleKind::Allow,
                    path_prefix: path.to_string(),
                },
            );
        }
    }

    rules
}

/// Resolve allowed/blocked for every crawler in the fixed list.
pub fn evaluate_permissions(rules: &RobotsRuleSet) -> Vec<CrawlerPermission> {
    AI_CRAWLERS
        .iter()
        .map(|&crawler| {
            let blocked = rules
                .effective_rules(crawler)
                .iter()
                .any(|r| r.kind == RuleKind::Disallow && r.path_prefix == "/");
            CrawlerPermission {
                crawler,
                allowed: !blocked,
            }
        })
        .collect()
}

/// Parse and evaluate robots.txt text into the client-facing analysis.
pub fn analyze_robots_text(text: &str) -> RobotsAnalysis {
    let rules = parse_robots_txt(text);
    let permissions = evaluate_permissions(&rules);
    let allowed_count = permissions.iter().filter(|p| p.allowed).count();

    let details = permissions
        .iter()
        .map(|p| {
            if p.allowed {
                Detail::new(
                    DetailKind::Success,
                    format!("{} is allowed to crawl your site", p.crawler),
                )
            } else {
                Detail::new(
                    DetailKind::Error,
                    format!("{} is blocked from crawling your site", p.crawler),
                )
            }
        })
        .collect();

    let status = if allowed_count * 2 > AI_CRAWLERS.len() {
        RobotsStatus::MostlyAllowed
    } else {
        RobotsStatus::MostlyBlocked
    };

    RobotsAnalysis {
        status,
        summary: format!(
            "{} out of {} major AI crawlers are allowed to access your site.",
            allowed_count,
            AI_CRAWLERS.len()
        ),
        details,
        raw_content: text.to_string(),
    }
}

/// Outcome of fetching robots.txt from a target site.
#[derive(Debug)]
pub enum RobotsFetch {
    Found(String),
    /// The server answered with a non-success status (typically 404)
    Missing,
}

/// Resolve the robots.txt location for a target page URL.
pub fn robots_url(target: &Url) -> Result<Url, url::ParseError> {
    target.join("/robots.txt")
}

/// Fetch robots.txt with the fixed timeout budget.
pub async fn fetch_robots_txt(
    client: &reqwest::Client,
    robots_url: Url,
) -> Result<RobotsFetch, reqwest::Error> {
    let response = client
        .get(robots_url)
        .header(ACCEPT, "text/plain")
        .timeout(ROBOTS_FETCH_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(RobotsFetch::Missing);
    }

    Ok(RobotsFetch::Found(response.text().await?))
}

/// Full robots analysis for one target URL. Never fails: every fetch outcome
/// is mapped to a status payload so the caller always has something to render.
pub async fn analyze_robots(client: &reqwest::Client, target: &Url) -> RobotsAnalysis {
    let robots_url = match robots_url(target) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(url = %target, error = %e, "cannot resolve robots.txt location");
            return RobotsAnalysis::unavailable();
        }
    };

    match fetch_robots_txt(client, robots_url).await {
        Ok(RobotsFetch::Found(text)) => analyze_robots_text(&text),
        Ok(RobotsFetch::Missing) => RobotsAnalysis::not_found(),
        Err(e) if e.is_timeout() => {
            tracing::warn!(url = %target, "robots.txt fetch timed out");
            RobotsAnalysis::timeout()
        }
        Err(e) if e.is_connect() => {
            tracing::warn!(url = %target, error = %e, "robots.txt fetch blocked");
            RobotsAnalysis::network_blocked()
        }
        Err(e) => {
            tracing::warn!(url = %target, error = %e, "robots.txt fetch failed");
            RobotsAnalysis::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permission_for(rules: &RobotsRuleSet, crawler: &str) -> bool {
        evaluate_permissions(rules)
            .into_iter()
            .find(|p| p.crawler == crawler)
            .map(|p| p.allowed)
            .expect("crawler is in the fixed list")
    }

    #[test]
    fn test_parse_groups_rules_by_user_agent() {
        let rules = parse_robots_txt("User-agent: GPTBot\nDisallow: /private\nAllow: /public\n");

        let group = rules.rules_for("GPTBot").expect("group exists");
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].kind, RuleKind::Disallow);
        assert_eq!(group[0].path_prefix, "/private");
        assert_eq!(group[1].kind, RuleKind::Allow);
        assert_eq!(group[1].path_prefix, "/public");
    }

    #[test]
    fn test_parse_rules_before_any_user_agent_go_to_wildcard() {
        let rules = parse_robots_txt("Disallow: /tmp\n");
        let group = rules.rules_for("*").expect("wildcard group exists");
        assert_eq!(group[0].path_prefix, "/tmp");
    }

    #[test]
    fn test_parse_directive_names_are_case_insensitive() {
        let rules = parse_robots_txt("USER-AGENT: GPTBot\nDISALLOW: /\n");
        assert!(!permission_for(&rules, "GPTBot"));
    }

    #[test]
    fn test_parse_agent_tokens_are_case_sensitive() {
        // "gptbot" is a different token than "GPTBot"; the crawler falls back
        // to the (absent) wildcard group and stays allowed
        let rules = parse_robots_txt("User-agent: gptbot\nDisallow: /\n");
        assert!(permission_for(&rules, "GPTBot"));
    }

    #[test]
    fn test_rule_value_keeps_embedded_colons() {
        let rules = parse_robots_txt("User-agent: GPTBot\nDisallow: /search:results\n");
        let group = rules.rules_for("GPTBot").expect("group exists");
        assert_eq!(group[0].path_prefix, "/search:results");
    }

    #[test]
    fn test_parse_ignores_malformed_and_unknown_lines() {
        let rules = parse_robots_txt(
            "# comment\nSitemap: https://example.com/sitemap.xml\nnonsense line\n\nDisallow /oops\n",
        );
        assert!(rules.is_empty());
    }

    #[test]
    fn test_parse_repeated_user_agent_accumulates_rules() {
        let text = "User-agent: GPTBot\nDisallow: /a\nUser-agent: BingBot\nDisallow: /b\nUser-agent: GPTBot\nDisallow: /c\n";
        let rules = parse_robots_txt(text);
        let group = rules.rules_for("GPTBot").expect("group exists");
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].path_prefix, "/a");
        assert_eq!(group[1].path_prefix, "/c");
    }

    #[test]
    fn test_empty_disallow_value_does_not_block() {
        let rules = parse_robots_txt("User-agent: *\nDisallow:\n");
        assert!(permission_for(&rules, "GPTBot"));
    }

    #[test]
    fn test_full_site_disallow_blocks_crawler() {
        let rules = parse_robots_txt("User-agent: GPTBot\nDisallow: /\n");
        assert!(!permission_for(&rules, "GPTBot"));
        assert!(permission_for(&rules, "BingBot"));
    }

    #[test]
    fn test_partial_path_disallow_does_not_block() {
        let rules = parse_robots_txt("User-agent: GPTBot\nDisallow: /admin\n");
        assert!(permission_for(&rules, "GPTBot"));
    }

    #[test]
    fn test_wildcard_applies_only_without_specific_group() {
        let text = "User-agent: *\nDisallow: /\nUser-agent: GPTBot\nDisallow: /private\n";
        let rules = parse_robots_txt(text);
        // GPTBot has its own group with only a partial disallow
        assert!(permission_for(&rules, "GPTBot"));
        // everyone else inherits the wildcard full-site disallow
        assert!(!permission_for(&rules, "PerplexityBot"));
        assert!(!permission_for(&rules, "GoogleBot"));
        assert!(!permission_for(&rules, "BingBot"));
    }

    #[test]
    fn test_no_rules_means_implicitly_allowed() {
        let rules = parse_robots_txt("");
        for permission in evaluate_permissions(&rules) {
            assert!(permission.allowed, "{} should be allowed", permission.crawler);
        }
    }

    #[test]
    fn test_analyze_all_blocked_scenario() {
        let analysis = analyze_robots_text("User-agent: *\nDisallow: /");

        assert_eq!(analysis.status, RobotsStatus::MostlyBlocked);
        assert_eq!(
            analysis.summary,
            "0 out of 4 major AI crawlers are allowed to access your site."
        );
        assert_eq!(analysis.details.len(), 4);
        assert!(analysis
            .details
            .iter()
            .all(|d| d.kind == DetailKind::Error && d.message.contains("blocked")));
        assert_eq!(analysis.raw_content, "User-agent: *\nDisallow: /");
    }

    #[test]
    fn test_analyze_no_full_disallow_allows_everyone() {
        let analysis = analyze_robots_text("User-agent: *\nDisallow: /cgi-bin\nDisallow: /tmp\n");

        assert_eq!(analysis.status, RobotsStatus::MostlyAllowed);
        assert_eq!(
            analysis.summary,
            "4 out of 4 major AI crawlers are allowed to access your site."
        );
        assert!(analysis
            .details
            .iter()
            .all(|d| d.kind == DetailKind::Success));
    }

    #[test]
    fn test_analyze_exactly_half_allowed_is_mostly_blocked() {
        let text = "User-agent: GPTBot\nDisallow: /\nUser-agent: PerplexityBot\nDisallow: /\n";
        let analysis = analyze_robots_text(text);

        assert_eq!(analysis.status, RobotsStatus::MostlyBlocked);
        assert_eq!(
            analysis.summary,
            "2 out of 4 major AI crawlers are allowed to access your site."
        );
    }

    #[test]
    fn test_robots_url_resolves_from_page_url() {
        let target = Url::parse("https://example.com/deep/page?x=1").expect("valid url");
        let robots = robots_url(&target).expect("joins");
        assert_eq!(robots.as_str(), "https://example.com/robots.txt");
    }
}
