//! Geometric validation of a candidate base pair.
//!
//! The validator compares the two residues' reference frames (origin distance, vertical
//! separation, angle between base normals), the distance between glycosidic nitrogens,
//! base-base hydrogen-bond candidates, and the overlap of the two base outlines seen along
//! the mean normal. Valid pairs are further typed as Watson-Crick or wobble from the
//! in-plane displacement and rotation between the frames.

use crate::geometry::overlap::polygon_intersection_area;
use crate::geometry::step::step_parameters;
use crate::geometry::{arb_rotation, dot2ang, magang};
use crate::model::pair::PairDescriptors;
use crate::model::residue::Residue;
use crate::model::types::{Point, RingKind};
use crate::ops::config::{PairingConfig, ValidationConfig};
use crate::ops::error::Error;
use crate::ops::frame::{RING_ATOM_NAMES, ring_atom_names};
use crate::ops::hbond::HydrogenBondFinder;
use nalgebra::{Point2, Vector3};

/// Longest distance at which a substituent counts as bonded to a ring atom.
const EXOCYCLIC_BOND: f64 = 2.0;

const WC_CODE_PAIRS: [&str; 8] = ["AT", "TA", "AU", "UA", "GC", "CG", "IC", "CI"];
const WATSON_CRICK_BONUS: f64 = 2.0;

const MAX_STRETCH: f64 = 2.0;
const MAX_OPENING: f64 = 60.0;
const WOBBLE_SHEAR: (f64, f64) = (1.8, 2.8);
const MAX_WC_SHEAR: f64 = 1.8;

/// Outcome of each validity criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationChecks {
    pub dorg: bool,
    pub d_v: bool,
    pub plane_angle: bool,
    pub dnn: bool,
    /// Enough base hydrogen-bond candidates, or enough ring overlap.
    pub contact: bool,
}

impl ValidationChecks {
    /// Whether the four distance and angle ranges hold.
    pub fn ranges(&self) -> bool {
        self.dorg && self.d_v && self.plane_angle && self.dnn
    }

    pub fn all(&self) -> bool {
        self.ranges() && self.contact
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// `0` invalid, `-1` valid but untyped, `1` wobble, `2` Watson-Crick.
    pub bp_type_id: i32,
    pub descriptors: PairDescriptors,
    pub checks: ValidationChecks,
    /// Raw base-base hydrogen-bond candidates.
    pub num_base_hb: usize,
    /// `dorg + 2·d_v + plane_angle/20`.
    pub base_score: f64,
    /// Base score less the Watson-Crick bonus where it applies; lower is better.
    pub quality_score: f64,
}

pub struct BasePairValidator<'a> {
    config: &'a ValidationConfig,
    hbond_finder: HydrogenBondFinder<'a>,
}

impl<'a> BasePairValidator<'a> {
    pub fn new(config: &'a PairingConfig) -> Self {
        Self {
            config: &config.validation,
            hbond_finder: HydrogenBondFinder::new(&config.hbond),
        }
    }

    /// Validates the pair `(residue_i, residue_j)`.
    ///
    /// Ring overlap and hydrogen-bond candidates are only computed when the range checks
    /// pass; otherwise both are reported as zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameUnset`] when either residue has no reference frame.
    pub fn validate(
        &self,
        residue_i: &Residue,
        residue_j: &Residue,
    ) -> Result<ValidationResult, Error> {
        let frame_i = residue_i
            .frame()
            .ok_or_else(|| Error::frame_unset(&residue_i.name, residue_i.id))?;
        let frame_j = residue_j
            .frame()
            .ok_or_else(|| Error::frame_unset(&residue_j.name, residue_j.id))?;

        let dorg_vec = frame_j.origin() - frame_i.origin();
        let dorg = dorg_vec.norm();
        let dir_x = frame_i.x_axis().dot(&frame_j.x_axis());
        let dir_y = frame_i.y_axis().dot(&frame_j.y_axis());
        let dir_z = frame_i.z_axis().dot(&frame_j.z_axis());

        let z_sum = if dir_z > 0.0 {
            frame_i.z_axis() + frame_j.z_axis()
        } else {
            frame_i.z_axis() - frame_j.z_axis()
        };
        let zave = z_sum.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        let d_v = dorg_vec.dot(&zave).abs();

        let mut plane_angle = dot2ang(dir_z);
        if plane_angle > 90.0 {
            plane_angle = 180.0 - plane_angle;
        }

        let dnn = glycosidic_distance(residue_i, residue_j);

        let cfg = self.config;
        let mut checks = ValidationChecks {
            dorg: cfg.dorg.contains(dorg),
            d_v: cfg.d_v.contains(d_v),
            plane_angle: cfg.plane_angle.contains(plane_angle),
            dnn: cfg.dnn.contains(dnn),
            contact: false,
        };

        // Overlap and hydrogen-bond candidates stay zero once a range check fails.
        let (overlap_area, num_base_hb) = if checks.ranges() {
            let mid = Point::from((frame_i.origin().coords + frame_j.origin().coords) / 2.0);
            (
                ring_overlap(residue_i, residue_j, &mid, &zave),
                self.hbond_finder.count_base_candidates(residue_i, residue_j),
            )
        } else {
            (0.0, 0)
        };
        checks.contact = num_base_hb >= cfg.min_base_hb || overlap_area > cfg.overlap_threshold;
        let is_valid = checks.all();

        let mut descriptors = PairDescriptors {
            dorg,
            d_v,
            plane_angle,
            dnn,
            dir_x,
            dir_y,
            dir_z,
            overlap_area,
            ..PairDescriptors::default()
        };

        let mut bp_type_id = if is_valid { -1 } else { 0 };
        if is_valid && dir_x > 0.0 && dir_y < 0.0 && dir_z < 0.0 {
            let reference_j = if dir_z <= 0.0 {
                frame_j.reversed()
            } else {
                *frame_j
            };
            let pars = step_parameters(&reference_j, frame_i);
            descriptors.shear = pars.shear();
            descriptors.stretch = pars.stretch();
            descriptors.opening = pars.opening();

            let shear = pars.shear().abs();
            if pars.stretch().abs() <= MAX_STRETCH && pars.opening().abs() <= MAX_OPENING {
                if shear >= WOBBLE_SHEAR.0 && shear <= WOBBLE_SHEAR.1 {
                    bp_type_id = 1;
                }
                if shear <= MAX_WC_SHEAR
                    && is_watson_crick_codes(residue_i.base_code(), residue_j.base_code())
                {
                    bp_type_id = 2;
                }
            }
        }

        let base_score = dorg + 2.0 * d_v + plane_angle / 20.0;
        let quality_score = if bp_type_id == 2 {
            base_score - WATSON_CRICK_BONUS
        } else {
            base_score
        };

        Ok(ValidationResult {
            is_valid,
            bp_type_id,
            descriptors,
            checks,
            num_base_hb,
            base_score,
            quality_score,
        })
    }
}

fn is_watson_crick_codes(code_i: char, code_j: char) -> bool {
    let pair: String = [code_i.to_ascii_uppercase(), code_j.to_ascii_uppercase()]
        .iter()
        .collect();
    WC_CODE_PAIRS.contains(&pair.as_str())
}

fn ring_kind(residue: &Residue) -> RingKind {
    residue.base().map(|b| b.ring).unwrap_or(if residue.has_atom("N9") {
        RingKind::Purine
    } else {
        RingKind::Pyrimidine
    })
}

/// N9–N9, N9–N1, or N1–N1 distance; infinite when either atom is missing.
fn glycosidic_distance(residue_i: &Residue, residue_j: &Residue) -> f64 {
    let n_i = residue_i.atom(ring_kind(residue_i).glycosidic_nitrogen());
    let n_j = residue_j.atom(ring_kind(residue_j).glycosidic_nitrogen());
    match (n_i, n_j) {
        (Some(a), Some(b)) => a.distance(b),
        _ => f64::INFINITY,
    }
}

/// Outline of a base: ring atoms in perimeter order, each replaced by its first bonded
/// exocyclic heavy atom when it has one.
fn base_outline(residue: &Residue) -> Vec<Point> {
    ring_atom_names(ring_kind(residue))
        .iter()
        .filter_map(|name| residue.atom(name))
        .map(|ring_atom| {
            residue
                .iter_atoms()
                .find(|a| {
                    !a.element.is_hydrogen()
                        && !RING_ATOM_NAMES.contains(&a.name.as_str())
                        && a.distance(ring_atom) <= EXOCYCLIC_BOND
                })
                .map_or(ring_atom.pos, |a| a.pos)
        })
        .collect()
}

/// Area shared by the two base outlines projected onto the plane through `mid`
/// perpendicular to `zave`.
fn ring_overlap(residue_i: &Residue, residue_j: &Residue, mid: &Point, zave: &Vector3<f64>) -> f64 {
    let z = Vector3::z();
    let rotation = arb_rotation(&zave.cross(&z), magang(zave, &z));
    let project = |points: Vec<Point>| -> Vec<Point2<f64>> {
        points
            .iter()
            .map(|p| {
                let v = rotation * (p - mid);
                Point2::new(v.x, v.y)
            })
            .collect()
    };

    let outline_i = project(base_outline(residue_i));
    let outline_j = project(base_outline(residue_j));
    polygon_intersection_area(&outline_i, &outline_j)
}
