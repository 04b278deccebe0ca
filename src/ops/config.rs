//! Tunable thresholds for frame calculation, pair validation, and hydrogen-bond search.
//!
//! Every field has a default equal to the long-standing analysis parameters, so an empty
//! document (or [`PairingConfig::default`]) reproduces the reference behavior. Partial
//! TOML documents override only the keys they name.

use crate::model::types::Element;
use crate::ops::error::Error;
use serde::Deserialize;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Largest ring-fit RMSD (Å) accepted as a nucleobase.
    pub rmsd_cutoff: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rmsd_cutoff: 0.2618,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub dorg: Limits,
    pub d_v: Limits,
    pub plane_angle: Limits,
    pub dnn: Limits,
    pub min_base_hb: usize,
    pub overlap_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            dorg: Limits::new(0.0, 15.0),
            d_v: Limits::new(0.0, 2.5),
            plane_angle: Limits::new(0.0, 65.0),
            dnn: Limits::new(4.5, 1.0e18),
            min_base_hb: 1,
            overlap_threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HBondConfig {
    /// Shortest donor-acceptor distance considered.
    pub lower: f64,
    /// Longest donor-acceptor distance considered.
    pub dist1: f64,
    /// Upper bound for promoting shared candidates in the second pass.
    pub dist2: f64,
    /// Elements allowed at either end of a bond.
    pub elements: Vec<Element>,
}

impl Default for HBondConfig {
    fn default() -> Self {
        Self {
            lower: 1.8,
            dist1: 4.0,
            dist2: 0.0,
            elements: vec![Element::N, Element::O],
        }
    }
}

impl HBondConfig {
    pub fn allows(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PairingConfig {
    pub frame: FrameConfig,
    pub validation: ValidationConfig,
    pub hbond: HBondConfig,
}

impl PairingConfig {
    /// Parses a TOML document and checks that every range is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for syntax errors, unknown keys, or inconsistent values.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: PairingConfig =
            toml::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.frame.rmsd_cutoff.is_finite() && self.frame.rmsd_cutoff > 0.0) {
            return Err(Error::config("frame.rmsd_cutoff must be a positive number"));
        }

        let ranges = [
            ("validation.dorg", self.validation.dorg),
            ("validation.d_v", self.validation.d_v),
            ("validation.plane_angle", self.validation.plane_angle),
            ("validation.dnn", self.validation.dnn),
        ];
        for (name, limits) in ranges {
            if limits.min.is_nan() || limits.max.is_nan() || limits.min > limits.max {
                return Err(Error::config(format!(
                    "{name} has min {} greater than max {}",
                    limits.min, limits.max
                )));
            }
        }

        if self.validation.overlap_threshold.is_nan() {
            return Err(Error::config("validation.overlap_threshold must be a number"));
        }

        let hb = &self.hbond;
        if !(hb.lower.is_finite() && hb.dist1.is_finite() && hb.dist2.is_finite()) {
            return Err(Error::config("hbond distances must be finite"));
        }
        if hb.lower > hb.dist1 {
            return Err(Error::config(format!(
                "hbond.lower ({}) exceeds hbond.dist1 ({})",
                hb.lower, hb.dist1
            )));
        }

        Ok(())
    }
}
