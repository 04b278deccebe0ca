//! Reference-frame assignment for nucleotide residues.
//!
//! A residue receives a frame when its name resolves to a base letter, its ring atoms sit
//! close to idealized ring geometry, and a standard template for the base exists. The
//! frame is the least-squares transform carrying the template's ring onto the residue's.
//! Failures never propagate: they are recorded on [`FrameResult`] and the residue is left
//! without a frame.

use crate::db::registry::BaseRegistry;
use crate::db::{TemplateKey, TemplateStore};
use crate::model::frame::{FrameSlot, ReferenceFrame};
use crate::model::residue::{BaseIdentity, Residue};
use crate::model::structure::Structure;
use crate::model::types::{Point, RingKind};
use crate::ops::config::FrameConfig;
use crate::ops::error::Error;
use crate::ops::fit::LeastSquaresFitter;
use crate::utils::parallel::*;
use smol_str::SmolStr;

/// Ring atoms in perimeter order; pyrimidines use the first six.
pub const RING_ATOM_NAMES: [&str; 9] = ["C4", "N3", "C2", "N1", "C6", "C5", "N7", "C8", "N9"];

const PURINE_ONLY_ATOMS: [&str; 3] = ["N7", "C8", "N9"];

/// Idealized ring coordinates in the standard base frame, matching [`RING_ATOM_NAMES`].
const STANDARD_RING: [[f64; 3]; 9] = [
    [-1.265, 3.177, 0.000],
    [-2.342, 2.364, 0.001],
    [-1.999, 1.087, 0.000],
    [-0.700, 0.641, 0.000],
    [0.424, 1.460, 0.000],
    [0.071, 2.833, 0.000],
    [0.870, 3.969, 0.000],
    [0.023, 4.962, 0.000],
    [-1.289, 4.551, 0.000],
];

const MIN_COMMON_RING_ATOMS: usize = 3;

/// Ring atom names for a ring kind, in perimeter order.
pub fn ring_atom_names(ring: RingKind) -> &'static [&'static str] {
    &RING_ATOM_NAMES[..ring.ring_size()]
}

/// Outcome of frame calculation for one residue.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    pub is_valid: bool,
    pub frame: FrameSlot,
    /// RMS deviation of the final template fit; `NaN` when no fit was made.
    pub rms_fit: f64,
    /// Names of the ring atoms used in the final fit.
    pub matched_atoms: Vec<SmolStr>,
    pub template_used: Option<TemplateKey>,
    /// One-letter code; lowercase for modified bases, `'?'` when unresolved.
    pub base_code: char,
    pub ring_kind: Option<RingKind>,
    /// Why the residue was rejected.
    pub failure: Option<Error>,
}

impl FrameResult {
    fn rejected(base_code: char, ring_kind: Option<RingKind>, failure: Error) -> Self {
        Self {
            is_valid: false,
            frame: FrameSlot::Unset,
            rms_fit: f64::NAN,
            matched_atoms: Vec::new(),
            template_used: None,
            base_code,
            ring_kind,
            failure: Some(failure),
        }
    }

    /// Base identity to store next to the frame, if the result is valid.
    pub fn base_identity(&self) -> Option<BaseIdentity> {
        match (self.is_valid, self.ring_kind) {
            (true, Some(ring)) => Some(BaseIdentity {
                code: self.base_code,
                ring,
            }),
            _ => None,
        }
    }
}

/// Ring atoms that passed the geometry check, paired with their ideal positions.
struct RingMatch {
    ring: RingKind,
    names: Vec<SmolStr>,
    standard: Vec<Point>,
    experimental: Vec<Point>,
}

pub struct BaseFrameCalculator<'a> {
    templates: &'a TemplateStore,
    registry: &'a BaseRegistry,
    config: FrameConfig,
}

impl<'a> BaseFrameCalculator<'a> {
    pub fn new(
        templates: &'a TemplateStore,
        registry: &'a BaseRegistry,
        config: &FrameConfig,
    ) -> Self {
        Self {
            templates,
            registry,
            config: config.clone(),
        }
    }

    /// Computes the reference frame of one residue without modifying it.
    ///
    /// Calling this twice on an unchanged residue returns identical results.
    pub fn calculate_frame(&self, residue: &Residue) -> FrameResult {
        let Some(code) = self.resolve_code(residue) else {
            let reason = if self.registry.is_excluded(&residue.name) {
                "residue name is on the exclusion list"
            } else {
                "residue name has no one-letter base code"
            };
            return FrameResult::rejected(
                '?',
                None,
                Error::classification(&residue.name, residue.id, reason),
            );
        };

        let ring = match self.classify_ring(residue, code) {
            Ok(ring) => ring,
            Err(e) => return FrameResult::rejected(code, None, e),
        };

        let ring_match = match self.check_ring_geometry(residue, ring) {
            Ok(m) => m,
            Err(e) => return FrameResult::rejected(code, Some(ring), e),
        };

        match self.fit_template(residue, code, &ring_match) {
            Ok((frame, rms, names, key)) => FrameResult {
                is_valid: true,
                frame: FrameSlot::Set(frame),
                rms_fit: rms,
                matched_atoms: names,
                template_used: Some(key),
                base_code: code,
                ring_kind: Some(ring_match.ring),
                failure: None,
            },
            Err(e) => FrameResult::rejected(code, Some(ring_match.ring), e),
        }
    }

    /// Calculates frames for every residue and stores them on the residues.
    ///
    /// Valid residues get [`FrameSlot::Set`] and their base identity; all others are
    /// cleared. Results are returned in residue order.
    pub fn apply_to(&self, structure: &mut Structure) -> Vec<FrameResult> {
        let results: Vec<FrameResult> = structure
            .par_residues_mut()
            .map(|residue| {
                let result = self.calculate_frame(residue);
                match (result.frame.get(), result.base_identity()) {
                    (Some(frame), Some(base)) => residue.assign_frame(*frame, base),
                    _ => {
                        residue.clear_frame();
                        if let Some(failure) = &result.failure {
                            log::debug!(
                                "no frame for residue {} {}{}: {}",
                                residue.chain_id,
                                residue.name,
                                residue.id,
                                failure
                            );
                        }
                    }
                }
                result
            })
            .collect();

        let framed = results.iter().filter(|r| r.is_valid).count();
        log::info!(
            "assigned reference frames to {} of {} residues",
            framed,
            results.len()
        );
        results
    }

    fn resolve_code(&self, residue: &Residue) -> Option<char> {
        if self.registry.is_excluded(&residue.name) {
            return None;
        }
        self.registry.one_letter_code(&residue.name)
    }

    /// Decides purine vs pyrimidine.
    ///
    /// Standard nucleotides take the ring kind from their code; anything ambiguous must
    /// carry enough of the shared six-membered ring, and the imidazole atoms decide.
    fn classify_ring(&self, residue: &Residue, code: char) -> Result<RingKind, Error> {
        let modified = code.is_ascii_lowercase();
        let from_code = RingKind::from_code(code);

        if let Some(ring) = from_code
            && !modified
            && !residue.molecule_type.is_ambiguous()
        {
            return Ok(ring);
        }

        let common = RING_ATOM_NAMES[..6]
            .iter()
            .filter(|name| residue.has_atom(name))
            .count();
        if common < MIN_COMMON_RING_ATOMS {
            return Err(Error::classification(
                &residue.name,
                residue.id,
                format!("only {common} of 6 common ring atoms present"),
            ));
        }

        if PURINE_ONLY_ATOMS.iter().any(|name| residue.has_atom(name)) {
            Ok(RingKind::Purine)
        } else {
            Ok(RingKind::Pyrimidine)
        }
    }

    /// Fits the residue's ring onto ideal ring geometry and applies the RMSD cutoff.
    ///
    /// A purine that fails is retried with its six-membered ring alone and, on success,
    /// reclassified as a pyrimidine.
    fn check_ring_geometry(&self, residue: &Residue, ring: RingKind) -> Result<RingMatch, Error> {
        let full = self.match_standard_ring(residue, ring);
        let rms = ring_rmsd(&full)?;
        if rms.is_some_and(|r| r <= self.config.rmsd_cutoff) {
            return Ok(full);
        }

        if ring == RingKind::Purine {
            let six = self.match_standard_ring(residue, RingKind::Pyrimidine);
            let rms_six = ring_rmsd(&six)?;
            if rms_six.is_some_and(|r| r <= self.config.rmsd_cutoff) {
                log::trace!(
                    "residue {}{} fits only as a pyrimidine ring (rmsd {:.4})",
                    residue.name,
                    residue.id,
                    rms_six.unwrap_or_default()
                );
                return Ok(six);
            }
        }

        let reason = match rms {
            Some(r) => format!(
                "ring rmsd {:.4} exceeds cutoff {:.4}",
                r, self.config.rmsd_cutoff
            ),
            None => format!("only {} ring atoms present", full.names.len()),
        };
        Err(Error::classification(&residue.name, residue.id, reason))
    }

    fn match_standard_ring(&self, residue: &Residue, ring: RingKind) -> RingMatch {
        let mut matched = RingMatch {
            ring,
            names: Vec::new(),
            standard: Vec::new(),
            experimental: Vec::new(),
        };
        for (name, pos) in ring_atom_names(ring).iter().zip(STANDARD_RING.iter()) {
            if let Some(atom) = residue.atom(name) {
                matched.names.push(atom.name.clone());
                matched.standard.push(Point::new(pos[0], pos[1], pos[2]));
                matched.experimental.push(atom.pos);
            }
        }
        matched
    }

    fn fit_template(
        &self,
        residue: &Residue,
        code: char,
        ring_match: &RingMatch,
    ) -> Result<(ReferenceFrame, f64, Vec<SmolStr>, TemplateKey), Error> {
        let modified = code.is_ascii_lowercase();
        let template = self
            .templates
            .resolve(code, modified)
            .ok_or(Error::TemplateLoad {
                base: code.to_ascii_uppercase(),
                modified,
            })?;

        let mut names = Vec::new();
        let mut standard = Vec::new();
        let mut experimental = Vec::new();
        for name in ring_atom_names(ring_match.ring) {
            if let (Some(t), Some(e)) = (template.atom(name), residue.atom(name)) {
                names.push(e.name.clone());
                standard.push(t.pos);
                experimental.push(e.pos);
            }
        }
        if names.len() < MIN_COMMON_RING_ATOMS {
            names = ring_match.names.clone();
            standard = ring_match.standard.clone();
            experimental = ring_match.experimental.clone();
        }

        let fit = LeastSquaresFitter::fit(&standard, &experimental)?;
        let frame = ReferenceFrame::new(fit.rotation, Point::from(fit.translation));
        Ok((frame, fit.rms, names, template.key()))
    }
}

/// RMSD of the ring fit, or `None` when too few atoms matched to fit at all.
fn ring_rmsd(ring_match: &RingMatch) -> Result<Option<f64>, Error> {
    if ring_match.names.len() < MIN_COMMON_RING_ATOMS {
        return Ok(None);
    }
    let fit = LeastSquaresFitter::fit(&ring_match.standard, &ring_match.experimental)?;
    Ok(Some(fit.rms))
}
