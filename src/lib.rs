// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Agent readiness scanner: analyzes how well a website is prepared for
//! AI-agent crawlers and serves the analysis over HTTP.

pub mod app;
pub mod models;
pub mod services;
