//! Configuration for isoline extraction and annotation.

use serde::{Deserialize, Serialize};

/// Configuration for the isoline builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolineConfig {
    /// Number of levels generated when no explicit level is requested.
    pub density: usize,

    /// Fraction of the value range kept clear at each end when levels are
    /// generated automatically.
    pub shift_percent: f64,

    /// Relative nudge applied to a level that coincides exactly with an
    /// edge endpoint, expressed as a fraction of the edge's value span.
    pub near_zero: f64,

    /// Hard cap on sub-cell steps while resolving one ambiguous cell.
    pub max_saddle_iterations: usize,

    /// What to do when tracing one level of a multi-level build fails.
    pub failure_policy: LevelFailurePolicy,

    /// Trace levels on the rayon pool instead of sequentially.
    pub parallel: bool,
}

impl Default for IsolineConfig {
    fn default() -> Self {
        Self {
            density: 12,
            shift_percent: 0.05,
            near_zero: 1e-4,
            max_saddle_iterations: 1000,
            failure_policy: LevelFailurePolicy::Abort,
            parallel: false,
        }
    }
}

impl IsolineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ISOLINE_DENSITY") {
            if let Ok(density) = val.parse() {
                config.density = density;
            }
        }

        if let Ok(val) = std::env::var("ISOLINE_SHIFT_PERCENT") {
            if let Ok(shift) = val.parse() {
                config.shift_percent = shift;
            }
        }

        if let Ok(val) = std::env::var("ISOLINE_NEAR_ZERO") {
            if let Ok(eps) = val.parse() {
                config.near_zero = eps;
            }
        }

        if let Ok(val) = std::env::var("ISOLINE_MAX_SADDLE_ITERATIONS") {
            if let Ok(cap) = val.parse() {
                config.max_saddle_iterations = cap;
            }
        }

        if let Ok(val) = std::env::var("ISOLINE_FAILURE_POLICY") {
            config.failure_policy = LevelFailurePolicy::from_str(&val);
        }

        if let Ok(val) = std::env::var("ISOLINE_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.density == 0 {
            return Err("density must be > 0".to_string());
        }

        if !(0.0..0.5).contains(&self.shift_percent) {
            return Err("shift_percent must be in [0, 0.5)".to_string());
        }

        if !(self.near_zero > 0.0 && self.near_zero < 0.5) {
            return Err("near_zero must be in (0, 0.5)".to_string());
        }

        if self.max_saddle_iterations == 0 {
            return Err("max_saddle_iterations must be > 0".to_string());
        }

        Ok(())
    }
}

/// Policy for a level whose trace raises an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelFailurePolicy {
    /// Abort the whole build and return the error.
    Abort,
    /// Log the failure, drop that level, keep the others.
    Skip,
}

impl Default for LevelFailurePolicy {
    fn default() -> Self {
        Self::Abort
    }
}

impl LevelFailurePolicy {
    /// Parse from string, falling back to `Abort`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "skip" | "continue" => Self::Skip,
            _ => Self::Abort,
        }
    }
}

/// Configuration for label placement along traced lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Arclength between consecutive labels on one line.
    pub way_before_text: f64,

    /// Fold label rotations into (-90, 90] so text never reads upside down.
    pub keep_upright: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            way_before_text: 10.0,
            keep_upright: false,
        }
    }
}

impl AnnotationConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ISOLINE_LABEL_SPACING") {
            if let Ok(spacing) = val.parse() {
                config.way_before_text = spacing;
            }
        }

        if let Ok(val) = std::env::var("ISOLINE_LABEL_UPRIGHT") {
            config.keep_upright = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.way_before_text.is_finite() && self.way_before_text > 0.0) {
            return Err("way_before_text must be a positive finite number".to_string());
        }
        Ok(())
    }
}
