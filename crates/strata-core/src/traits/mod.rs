// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability trait definitions consumed by the router.
//!
//! Both capabilities extend the [`CapabilityAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod generator;
pub mod tools;

pub use adapter::CapabilityAdapter;
pub use generator::TextGenerator;
pub use tools::ToolInvoker;
