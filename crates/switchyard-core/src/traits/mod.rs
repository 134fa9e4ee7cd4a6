// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Switchyard does not own the backend registry; it reads snapshots from
//! whatever implements [`RegistrySource`].

pub mod registry;

pub use registry::RegistrySource;
