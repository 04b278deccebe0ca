//! Mutual-best base-pair selection over a framed structure.
//!
//! Each pass walks the framed residues in order. An unmatched residue `i` looks for the
//! unmatched partner `j` with the lowest adjusted score; when `i` is in turn `j`'s best
//! partner the two are paired and leave the pool. Passes repeat until one adds nothing.

use crate::model::pair::BasePair;
use crate::model::residue::Residue;
use crate::model::structure::Structure;
use crate::ops::config::PairingConfig;
use crate::ops::error::Error;
use crate::ops::hbond::{HBondResult, HydrogenBondFinder};
use crate::ops::validate::{BasePairValidator, ValidationResult};
use crate::utils::parallel::*;

const GOOD_HB_BONUS_CAP: f64 = 3.0;

/// Score adjustment for the number of good hydrogen bonds in a pair.
pub fn hb_adjustment(num_good_hb: usize) -> f64 {
    if num_good_hb >= 2 {
        -GOOD_HB_BONUS_CAP
    } else {
        -(num_good_hb as f64)
    }
}

/// Validation and hydrogen bonds of one ordered residue pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairAssessment {
    pub validation: ValidationResult,
    /// Empty when the pair is invalid.
    pub hbonds: HBondResult,
    /// Quality score plus [`hb_adjustment`]; lower is better.
    pub adjusted_score: f64,
}

impl PairAssessment {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }
}

pub struct PairFinder<'a> {
    validator: BasePairValidator<'a>,
    hbond_finder: HydrogenBondFinder<'a>,
}

impl<'a> PairFinder<'a> {
    pub fn new(config: &'a PairingConfig) -> Self {
        Self {
            validator: BasePairValidator::new(config),
            hbond_finder: HydrogenBondFinder::new(&config.hbond),
        }
    }

    /// Validates `residue_i` against `residue_j` and, for valid pairs, collects their
    /// hydrogen bonds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameUnset`] when either residue has no reference frame.
    pub fn assess(&self, residue_i: &Residue, residue_j: &Residue) -> Result<PairAssessment, Error> {
        let validation = self.validator.validate(residue_i, residue_j)?;
        let hbonds = if validation.is_valid {
            self.hbond_finder.find(residue_i, residue_j)
        } else {
            HBondResult::default()
        };
        let adjusted_score = validation.quality_score + hb_adjustment(hbonds.num_good_hb);

        Ok(PairAssessment {
            validation,
            hbonds,
            adjusted_score,
        })
    }

    /// Finds the base pairs of `structure`.
    ///
    /// Only residues with a reference frame take part. Every pair is assessed in
    /// smaller-index-first order, so a pair scores identically from either side and the
    /// recorded pair carries exactly the assessment it was selected on. Pairs are returned
    /// in discovery order with report indices `1..=n`.
    ///
    /// # Errors
    ///
    /// Propagates validation errors; none occur for framed residues.
    pub fn find_pairs(&self, structure: &Structure) -> Result<Vec<BasePair>, Error> {
        let residues = structure.residues();
        let framed: Vec<usize> = residues
            .iter()
            .enumerate()
            .filter(|(_, r)| r.frame().is_some())
            .map(|(i, _)| i)
            .collect();
        let mut matched = vec![false; residues.len()];
        let mut pairs = Vec::new();

        loop {
            let mut added = false;
            for &i in &framed {
                if matched[i] {
                    continue;
                }
                let Some((j, assessment)) = self.best_partner(residues, &framed, &matched, i)?
                else {
                    continue;
                };
                let reciprocal = self.best_partner(residues, &framed, &matched, j)?;
                if reciprocal.map(|(k, _)| k) != Some(i) {
                    continue;
                }

                matched[i] = true;
                matched[j] = true;
                pairs.push(build_pair(residues, i, j, assessment)?);
                added = true;
            }
            if !added {
                break;
            }
        }

        for (k, pair) in pairs.iter_mut().enumerate() {
            pair.set_index(k + 1);
            log::debug!(
                "pair {}: {}{} - {}{} ({}, {} hbonds, score {:.3})",
                k + 1,
                residues[pair.residue_i()].name,
                residues[pair.residue_i()].id,
                residues[pair.residue_j()].name,
                residues[pair.residue_j()].id,
                pair.bp_type().name(),
                pair.hbonds().len(),
                pair.quality_score()
            );
        }
        log::info!(
            "found {} base pairs among {} framed residues",
            pairs.len(),
            framed.len()
        );
        Ok(pairs)
    }

    /// Assesses residues `a` and `b` of `residues` with the smaller index first.
    fn assess_canonical(
        &self,
        residues: &[Residue],
        a: usize,
        b: usize,
    ) -> Result<PairAssessment, Error> {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.assess(&residues[lo], &residues[hi])
    }

    /// Lowest-scoring valid unmatched partner of `i` and its assessment; the first index
    /// wins ties.
    fn best_partner(
        &self,
        residues: &[Residue],
        framed: &[usize],
        matched: &[bool],
        i: usize,
    ) -> Result<Option<(usize, PairAssessment)>, Error> {
        let scored: Vec<Result<Option<(usize, PairAssessment)>, Error>> = framed
            .par_iter()
            .filter(|&&j| j != i && !matched[j])
            .map(|&j| {
                let assessment = self.assess_canonical(residues, i, j)?;
                Ok(assessment.is_valid().then_some((j, assessment)))
            })
            .collect();

        let mut best: Option<(usize, PairAssessment)> = None;
        for candidate in scored {
            if let Some((j, assessment)) = candidate?
                && best
                    .as_ref()
                    .is_none_or(|(_, lowest)| assessment.adjusted_score < lowest.adjusted_score)
            {
                best = Some((j, assessment));
            }
        }
        Ok(best)
    }
}

/// Records the pair found as `(i, j)` from its canonical assessment.
///
/// The stored quality score is the adjusted score the pair won selection with.
fn build_pair(
    residues: &[Residue],
    i: usize,
    j: usize,
    assessment: PairAssessment,
) -> Result<BasePair, Error> {
    let frame_of = |index: usize| {
        let residue = &residues[index];
        residue
            .frame()
            .copied()
            .ok_or_else(|| Error::frame_unset(&residue.name, residue.id))
    };
    let (frame_first, frame_second) = (frame_of(i)?, frame_of(j)?);

    Ok(BasePair::new(
        i,
        j,
        frame_first,
        frame_second,
        assessment.validation.bp_type_id,
        assessment.hbonds.bonds,
        assessment.adjusted_score,
        assessment.validation.descriptors,
    ))
}
