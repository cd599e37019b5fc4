// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the two capabilities the router consumes.
//!
//! - [`MockGenerator`] - scripted text generation with call capture
//! - [`MockToolInvoker`] - per-tool canned results with call capture

pub mod mock_generator;
pub mod mock_tools;

pub use mock_generator::MockGenerator;
pub use mock_tools::MockToolInvoker;
