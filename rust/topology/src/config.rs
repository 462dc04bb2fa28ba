// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared configuration for the reconciliation, sweep and matching services.

use brepkit_geometry::ToleranceConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matcher::BrepMatcher;
use crate::reconcile::{EdgeReconciler, DEFAULT_MAX_ROUNDS};
use crate::sweep::PathAssembler;

/// Tolerances plus the reconciler's round limit.
///
/// ```
/// use brepkit_topology::TopologyConfig;
///
/// let config = TopologyConfig::from_json(r#"{ "reconcile_rounds": 3 }"#).unwrap();
/// assert_eq!(config.reconcile_rounds, 3);
/// assert_eq!(config.tolerance.tol, 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub tolerance: ToleranceConfig,
    /// Maximum snapping rounds before the reconciler gives up
    pub reconcile_rounds: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            tolerance: ToleranceConfig::default(),
            reconcile_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl TopologyConfig {
    /// Parses and validates a configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(brepkit_geometry::Error::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(brepkit_geometry::Error::from)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.tolerance.validate()?;
        if self.reconcile_rounds == 0 {
            return Err(Error::Underconstrained("reconcile_rounds must be at least 1".into()));
        }
        Ok(())
    }

    pub fn reconciler(&self) -> EdgeReconciler {
        EdgeReconciler::new(self.tolerance).with_max_rounds(self.reconcile_rounds)
    }

    pub fn assembler(&self) -> PathAssembler {
        PathAssembler::new(self.tolerance)
    }

    pub fn matcher(&self) -> BrepMatcher {
        BrepMatcher::new(self.tolerance)
    }
}
