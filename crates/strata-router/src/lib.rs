// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complexity-tiered request routing.
//!
//! A request is classified by the [`ComplexityAssessor`], dispatched to one of
//! four [`TierProcessor`]s by a fixed table, and returned as a
//! [`Response`](strata_core::Response) annotated with the assessment. The
//! [`Router`] never fails: processing errors become error-flagged responses.

pub mod assessor;
pub mod processors;
pub mod router;

pub use assessor::ComplexityAssessor;
pub use processors::{Capabilities, TierProcessor};
pub use router::{AssessmentPreview, Router, RouterStatus};
