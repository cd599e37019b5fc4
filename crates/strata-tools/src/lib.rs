// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process implementation of the tool-invocation capability.
//!
//! [`ToolRegistry`] dispatches [`ToolCall`](strata_core::ToolCall)s by name to
//! registered [`Tool`]s. [`builtin::reasoning_tools`] registers the five
//! reasoning scaffolds the moderate and complex tiers call.

pub mod builtin;
pub mod tool;

pub use builtin::reasoning_tools;
pub use tool::{Tool, ToolRegistry};
