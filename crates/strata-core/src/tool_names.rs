// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Names of the auxiliary reasoning tools used by the moderate and complex tiers.
//!
//! [`MERGE_ORDER`] is the order tool outputs are folded into synthesis prompts,
//! independent of the order the calls completed in.

pub const SEQUENTIAL_THINKING: &str = "sequentialthinking";
pub const MENTAL_MODEL: &str = "mentalmodel";
pub const DESIGN_PATTERN: &str = "designpattern";
pub const SCIENTIFIC_METHOD: &str = "scientificmethod";
pub const COLLABORATIVE_REASONING: &str = "collaborativereasoning";

pub const MERGE_ORDER: [&str; 5] = [
    SEQUENTIAL_THINKING,
    MENTAL_MODEL,
    DESIGN_PATTERN,
    SCIENTIFIC_METHOD,
    COLLABORATIVE_REASONING,
];
