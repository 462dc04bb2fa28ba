// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building geometry primitives
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate curve: {0}")]
    DegenerateCurve(String),

    #[error("Degenerate surface: {0}")]
    DegenerateSurface(String),

    #[error("Invalid tolerance configuration: {0}")]
    InvalidTolerance(String),

    #[error("Tolerance configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
