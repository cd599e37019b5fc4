// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mid-flight intervention and guidance for routed requests.
//!
//! An external controller can stop, pause, resume, redirect or override a
//! tracked request, and can be asked which tier a request should use. Both
//! sides share request ids with the router but not its control flow.

pub mod guidance;
pub mod manager;
pub mod status;

pub use guidance::GuidanceBroker;
pub use manager::InterventionManager;
pub use status::{InterventionStats, InterventionStatus, ProcessingState};
