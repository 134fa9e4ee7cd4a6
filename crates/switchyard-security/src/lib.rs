// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential redaction for Switchyard.
//!
//! Request bodies, provider error messages and log lines can echo caller
//! credentials back. Everything Switchyard writes passes through [`redact`]
//! or a [`RedactingWriter`] first.

pub mod redact;

pub use redact::{REDACTED, RedactingWriter, redact};
