//! Records shaped like the legacy base-pair output.
//!
//! [`LegacyPairRecord`] maps one [`BasePair`] onto the field layout downstream tools
//! expect. Residue indices become 1-based, and `dir_xyz` carries
//! `[dir_y, dir_z, 0.0]` rather than the three axis cosines: the historical format
//! shifted the values by one slot and consumers rely on it. Nothing outside this module
//! reproduces that layout.

use crate::model::pair::{BasePair, HydrogenBond};
use crate::model::structure::Structure;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyHBondRecord {
    pub donor_atom: String,
    pub acceptor_atom: String,
    pub distance: f64,
    #[serde(rename = "type")]
    pub kind: char,
    pub linkage_type: i32,
}

impl From<&HydrogenBond> for LegacyHBondRecord {
    fn from(bond: &HydrogenBond) -> Self {
        Self {
            donor_atom: bond.donor.to_string(),
            acceptor_atom: bond.acceptor.to_string(),
            distance: bond.distance,
            kind: bond.kind.as_char(),
            linkage_type: bond.linkage_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPairRecord {
    /// 1-based report index, `0` when the pair was never numbered.
    pub index: usize,
    /// 1-based residue index of the smaller-indexed residue.
    pub base_i: usize,
    pub base_j: usize,
    /// Two-letter base codes such as `"GC"`.
    pub bp_type: String,
    pub bp_type_id: i32,
    pub dir_xyz: [f64; 3],
    pub dorg: f64,
    pub d_v: f64,
    pub plane_angle: f64,
    pub dnn: f64,
    pub overlap_area: f64,
    pub quality_score: f64,
    pub orien_i: [[f64; 3]; 3],
    pub orien_j: [[f64; 3]; 3],
    pub org_i: [f64; 3],
    pub org_j: [f64; 3],
    pub hbonds: Vec<LegacyHBondRecord>,
}

impl LegacyPairRecord {
    /// Builds the legacy record for `pair`, reading base codes from `structure`.
    ///
    /// # Arguments
    ///
    /// * `pair` - Finalized pair with smaller-first residue indices.
    /// * `structure` - Structure the pair was found in; residues missing from it report
    ///   `'?'` as their base code.
    pub fn from_pair(pair: &BasePair, structure: &Structure) -> Self {
        let code = |index: usize| {
            structure
                .residue(index)
                .map_or('?', |r| r.base_code())
        };
        let d = pair.descriptors();

        Self {
            index: pair.index().unwrap_or(0),
            base_i: pair.residue_i() + 1,
            base_j: pair.residue_j() + 1,
            bp_type: [code(pair.residue_i()), code(pair.residue_j())]
                .iter()
                .collect(),
            bp_type_id: pair.bp_type_id(),
            dir_xyz: [d.dir_y, d.dir_z, 0.0],
            dorg: d.dorg,
            d_v: d.d_v,
            plane_angle: d.plane_angle,
            dnn: d.dnn,
            overlap_area: d.overlap_area,
            quality_score: pair.quality_score(),
            orien_i: rows(pair.frame_i().rotation()),
            orien_j: rows(pair.frame_j().rotation()),
            org_i: pair.frame_i().origin().coords.into(),
            org_j: pair.frame_j().origin().coords.into(),
            hbonds: pair.hbonds().iter().map(LegacyHBondRecord::from).collect(),
        }
    }

    /// Records for every pair, in the order given.
    pub fn from_pairs(pairs: &[BasePair], structure: &Structure) -> Vec<Self> {
        pairs
            .iter()
            .map(|pair| Self::from_pair(pair, structure))
            .collect()
    }
}

fn rows(matrix: &nalgebra::Matrix3<f64>) -> [[f64; 3]; 3] {
    std::array::from_fn(|r| std::array::from_fn(|c| matrix[(r, c)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::frame::ReferenceFrame;
    use crate::model::pair::{HBondType, PairDescriptors};
    use crate::model::residue::{BaseIdentity, Residue};
    use crate::model::types::{Element, MoleculeType, Point, RingKind};
    use nalgebra::Matrix3;
    use smol_str::SmolStr;

    fn structure() -> Structure {
        let mut g = Residue::new("A", 1, "G", MoleculeType::Nucleotide);
        g.add_atom(Atom::new("N9", Element::N, Point::origin()));
        g.assign_frame(
            ReferenceFrame::identity(),
            BaseIdentity {
                code: 'G',
                ring: RingKind::Purine,
            },
        );
        let mut c = Residue::new("B", 7, "C", MoleculeType::Nucleotide);
        c.add_atom(Atom::new("N1", Element::N, Point::origin()));
        c.assign_frame(
            ReferenceFrame::new(
                Matrix3::from_diagonal(&nalgebra::Vector3::new(1.0, -1.0, -1.0)),
                Point::new(0.5, 0.0, 0.0),
            ),
            BaseIdentity {
                code: 'C',
                ring: RingKind::Pyrimidine,
            },
        );
        Structure::from_residues(vec![g, c])
    }

    fn pair(structure: &Structure) -> BasePair {
        let frame = |i: usize| *structure.residue(i).unwrap().frame().unwrap();
        let descriptors = PairDescriptors {
            dorg: 0.5,
            dir_x: 1.0,
            dir_y: -0.9,
            dir_z: -0.8,
            ..PairDescriptors::default()
        };
        let bond = HydrogenBond {
            donor: SmolStr::new("N1"),
            acceptor: SmolStr::new("N3"),
            distance: 2.91,
            kind: HBondType::Standard,
            linkage_type: 18,
        };
        let mut pair = BasePair::new(1, 0, frame(1), frame(0), 2, vec![bond], -1.5, descriptors);
        pair.set_index(4);
        pair
    }

    #[test]
    fn record_uses_one_based_indices() {
        let structure = structure();
        let record = LegacyPairRecord::from_pair(&pair(&structure), &structure);

        assert_eq!(record.index, 4);
        assert_eq!((record.base_i, record.base_j), (1, 2));
        assert_eq!(record.bp_type, "GC");
        assert_eq!(record.bp_type_id, 2);
    }

    #[test]
    fn dir_xyz_keeps_the_shifted_layout() {
        let structure = structure();
        let record = LegacyPairRecord::from_pair(&pair(&structure), &structure);

        assert_eq!(record.dir_xyz, [-0.9, -0.8, 0.0]);
    }

    #[test]
    fn frames_follow_canonical_order() {
        let structure = structure();
        let record = LegacyPairRecord::from_pair(&pair(&structure), &structure);

        assert_eq!(record.org_i, [0.0, 0.0, 0.0]);
        assert_eq!(record.org_j, [0.5, 0.0, 0.0]);
        assert_eq!(record.orien_j[1], [0.0, -1.0, 0.0]);
        assert_eq!(record.orien_j[2], [0.0, 0.0, -1.0]);
    }

    #[test]
    fn hbonds_carry_legacy_type_characters() {
        let structure = structure();
        let record = LegacyPairRecord::from_pair(&pair(&structure), &structure);

        assert_eq!(record.hbonds.len(), 1);
        assert_eq!(record.hbonds[0].kind, '-');
        assert_eq!(record.hbonds[0].donor_atom, "N1");
        assert_eq!(record.hbonds[0].linkage_type, 18);
    }

    #[test]
    fn record_serializes_type_under_legacy_key() {
        let structure = structure();
        let records = LegacyPairRecord::from_pairs(&[pair(&structure)], &structure);

        let text = toml::to_string(&records[0]).unwrap();

        assert!(text.contains("dir_xyz"));
        assert!(text.contains("type = \"-\""));
    }
}
