// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Page fetching and metadata extraction.

use crate::models::page::PageData;
use anyhow::Result;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Maximum number of characters of body text kept for analysis.
const CONTENT_PREVIEW_CHARS: usize = 1000;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static NAVIGATION: LazyLock<Selector> = LazyLock::new(|| selector("nav"));
static MAIN_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector("main, article"));
static FOOTER: LazyLock<Selector> = LazyLock::new(|| selector("footer"));

fn selector(s: &str) -> Selector {
    Selector::parse(s).expect("static selector")
}

/// Fetch a page and extract the data the analysis needs.
pub async fn fetch_page_data(client: &reqwest::Client, target: &Url) -> Result<PageData> {
    let response = client.get(target.clone()).send().await?;
    let html = response.text().await?;
    Ok(extract_page_data(&html))
}

/// Extract title, meta description, structured data, a body-text preview and
/// structural landmarks from an HTML document.
pub fn extract_page_data(html: &str) -> PageData {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let description = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
        .filter(|d| !d.is_empty());

    PageData {
        title,
        description,
        content: body_preview(&document),
        structured_data: extract_structured_data(&document),
        key_elements: detect_key_elements(&document),
    }
}

/// First `application/ld+json` block, parsed. Malformed JSON-LD degrades to
/// no structured data instead of failing the whole extraction.
fn extract_structured_data(document: &Html) -> Option<serde_json::Value> {
    let raw = document.select(&LD_JSON).next()?.inner_html();
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed JSON-LD block");
            None
        }
    }
}

/// Whitespace-normalized body text, truncated to the preview budget.
fn body_preview(document: &Html) -> String {
    let Some(body) = document.select(&BODY).next() else {
        return String::new();
    };
    let text = body.text().collect::<Vec<_>>().join(" ");
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    normalized.chars().take(CONTENT_PREVIEW_CHARS).collect()
}

/// Structural landmarks AI agents navigate by.
fn detect_key_elements(document: &Html) -> Vec<String> {
    let mut elements = Vec::new();
    if document.select(&NAVIGATION).next().is_some() {
        elements.push("navigation".to_string());
    }
    if document.select(&MAIN_CONTENT).next().is_some() {
        elements.push("content".to_string());
    }
    if document.select(&FOOTER).next().is_some() {
        elements.push("footer".to_string());
    }
    elements
}
