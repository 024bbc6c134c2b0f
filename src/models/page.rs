// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Page content and metadata extracted from a fetched document. Treated as
/// opaque input by the scoring layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// `<title>` text; `None` when absent or empty
    pub title: Option<String>,
    /// `meta[name="description"]` content
    pub description: Option<String>,
    /// Body text, truncated to 1000 characters
    pub content: String,
    /// First `application/ld+json` block, parsed
    #[schema(value_type = Object)]
    pub structured_data: Option<serde_json::Value>,
    /// Structural landmarks detected in the markup
    pub key_elements: Vec<String>,
}

impl PageData {
    /// Substitute used when the page fetch fails. The placeholder strings are
    /// rendered to the user as-is.
    pub fn unavailable() -> Self {
        Self {
            title: Some("Unable to fetch page title".to_string()),
            description: Some("Unable to fetch page description".to_string()),
            content: "Unable to fetch page content".to_string(),
            structured_data: None,
            key_elements: Vec::new(),
        }
    }

    pub fn has_structured_data(&self) -> bool {
        self.structured_data.is_some()
    }
}
