// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! AI readiness score aggregation.

use crate::models::robots::RobotsStatus;

/// Boolean/numeric signals the score is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ScoreSignals {
    pub has_title: bool,
    pub has_meta_description: bool,
    pub content_length: usize,
    pub has_structured_data: bool,
    pub robots_status: RobotsStatus,
}

/// Weighted sum of readiness signals, clamped to [0, 100].
///
/// Deterministic and order-independent; a missing robots.txt still earns a
/// partial bonus because crawlers then assume default permissions.
pub fn ai_readiness_score(signals: &ScoreSignals) -> u8 {
    let mut score: u32 = 0;

    if signals.has_title {
        score += 20;
    }
    if signals.has_meta_description {
        score += 15;
    }
    if signals.content_length > 500 {
        score += 20;
    }
    if signals.has_structured_data {
        score += 25;
    }
    score += match signals.robots_status {
        RobotsStatus::MostlyAllowed => 20,
        RobotsStatus::NotFound => 10,
        _ => 0,
    };

    score.min(100) as u8
}
