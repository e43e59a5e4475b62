// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the tradsync library.
//!
//! This module provides the error hierarchy used across the library:
//! path resolution, color conversion, object-store access and gateway
//! command failures.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while resolving or writing a property path.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// Error occurred during color conversion.
    #[error("color error: {0}")]
    Color(#[from] ColorError),

    /// Error reported by the external object store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Error reported by the gateway client.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A domain object failed to serialize for path resolution.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the path resolver.
///
/// `NotFound` is a distinguishable outcome rather than a generic failure:
/// callers that treat a missing field as expected (the sync engine refreshing
/// per-binding values) can match on it and skip, while every other caller
/// propagates it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The traversal hit an absent or null value before the path was
    /// exhausted.
    #[error("no value at segment `{segment}` of path `{path}`")]
    NotFound {
        /// The full path that was requested.
        path: String,
        /// The segment at which traversal stopped.
        segment: String,
    },

    /// An empty path was given.
    #[error("empty path")]
    Empty,
}

/// Errors related to color parsing and conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// A hex color string could not be parsed.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(u16),

    /// A saturation value is outside the valid range (0-100).
    #[error("saturation value {0} is out of range [0, 100]")]
    InvalidSaturation(u8),
}

/// Errors reported by the external object store.
///
/// The sync engine performs no retry or backoff; these propagate to its
/// caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entry that was expected to exist is missing.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// The storage backend rejected the operation.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors reported by the gateway client when issuing commands.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway rejected or failed to deliver a request.
    #[error("request failed: {0}")]
    Request(String),

    /// The targeted device is not known to the gateway.
    #[error("device {0} not found")]
    DeviceNotFound(u32),
}

/// A specialized Result type for this library.
pub type Result<T, E = Error> = std::result::Result<T, E>;
