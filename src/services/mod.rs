// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod analysis;
pub mod gemini;
pub mod page;
pub mod robots;
pub mod score;
