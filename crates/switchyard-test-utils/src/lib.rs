// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! Provides a mock registry and request fixtures for fast, deterministic
//! tests without a host gateway.
//!
//! # Components
//!
//! - [`MockRegistry`] - Registry source with swappable contents, snapshot
//!   counting, and failure injection
//! - [`fixtures`] - Request bodies and contexts shaped like real CLI traffic

pub mod fixtures;
pub mod mock_registry;

pub use mock_registry::MockRegistry;
