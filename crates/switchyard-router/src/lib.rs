// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request classification and backend routing for Switchyard.
//!
//! This crate provides:
//! - [`Rule`]: the built-in classification predicates
//! - [`Classifier`]: ordered first-match classification into a label
//! - [`ModelRouter`]: lazily loaded, reloadable label-to-backend lookup
//! - [`StaticRegistry`]: a registry source over configured backends

pub mod classifier;
pub mod registry;
pub mod router;
pub mod rules;
pub mod tokens;

pub use classifier::{ClassificationTable, Classifier};
pub use registry::StaticRegistry;
pub use router::{ModelRouter, RouterCache};
pub use rules::Rule;
pub use tokens::TokenCounter;
