//! Records describing accepted base pairs and the hydrogen bonds that support them.

use super::frame::ReferenceFrame;
use smol_str::SmolStr;
use std::fmt;

/// Chemical classification of a hydrogen bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HBondType {
    /// Donor/acceptor roles are chemically consistent (`'-'`).
    Standard,
    /// At least one role is unknown or both atoms play the same role (`'*'`).
    NonStandard,
    /// Candidate rejected during resolution or filtering (`' '`).
    Invalid,
}

impl HBondType {
    pub fn as_char(&self) -> char {
        match self {
            HBondType::Standard => '-',
            HBondType::NonStandard => '*',
            HBondType::Invalid => ' ',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(HBondType::Standard),
            '*' => Some(HBondType::NonStandard),
            ' ' => Some(HBondType::Invalid),
            _ => None,
        }
    }
}

impl fmt::Display for HBondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Hydrogen bond between an atom of the first residue and an atom of the second.
///
/// `donor` always names the atom of the first residue of the pair and `acceptor` the atom
/// of the second; the chemical roles are captured by [`HBondType`].
#[derive(Debug, Clone, PartialEq)]
pub struct HydrogenBond {
    pub donor: SmolStr,
    pub acceptor: SmolStr,
    /// Donor-acceptor distance in ångströms; always positive.
    pub distance: f64,
    pub kind: HBondType,
    /// 18 when the bond was selected directly; otherwise the count of atoms it shares with
    /// selected bonds.
    pub linkage_type: i32,
}

impl fmt::Display for HydrogenBond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{} {:.2}",
            self.donor,
            self.kind.as_char(),
            self.acceptor,
            self.distance
        )
    }
}

/// Pairing classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasePairType {
    WatsonCrick,
    Wobble,
    Hoogsteen,
    Unknown,
}

impl BasePairType {
    /// Maps the numeric pair type (2 = Watson-Crick, 1 = wobble).
    pub fn from_type_id(bp_type_id: i32) -> Self {
        match bp_type_id {
            2 => BasePairType::WatsonCrick,
            1 => BasePairType::Wobble,
            _ => BasePairType::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BasePairType::WatsonCrick => "Watson-Crick",
            BasePairType::Wobble => "Wobble",
            BasePairType::Hoogsteen => "Hoogsteen",
            BasePairType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BasePairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Geometric descriptors measured between the two frames of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairDescriptors {
    /// Origin-to-origin distance.
    pub dorg: f64,
    /// Origin displacement along the mean base normal.
    pub d_v: f64,
    /// Angle between base normals folded into [0, 90] degrees.
    pub plane_angle: f64,
    /// Distance between the glycosidic nitrogens.
    pub dnn: f64,
    pub dir_x: f64,
    pub dir_y: f64,
    pub dir_z: f64,
    /// Projected ring overlap in Å².
    pub overlap_area: f64,
    pub shear: f64,
    pub stretch: f64,
    pub opening: f64,
}

/// A finalized base pair.
///
/// Indices are stored smaller-first. Both frames are required at construction, so a pair
/// can never refer to a residue without a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePair {
    residue_i: usize,
    residue_j: usize,
    finding_order_swapped: bool,
    bp_type: BasePairType,
    bp_type_id: i32,
    frame_i: ReferenceFrame,
    frame_j: ReferenceFrame,
    hbonds: Vec<HydrogenBond>,
    quality_score: f64,
    descriptors: PairDescriptors,
    index: Option<usize>,
}

impl BasePair {
    /// Builds a pair from residues given in discovery order.
    ///
    /// `frame_first` belongs to `first` and `frame_second` to `second`; they are swapped
    /// along with the indices when `first > second`. Hydrogen bonds and descriptors must
    /// already be expressed in canonical (smaller-first) order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first: usize,
        second: usize,
        frame_first: ReferenceFrame,
        frame_second: ReferenceFrame,
        bp_type_id: i32,
        hbonds: Vec<HydrogenBond>,
        quality_score: f64,
        descriptors: PairDescriptors,
    ) -> Self {
        debug_assert_ne!(first, second, "a residue cannot pair with itself");
        let swapped = first > second;
        let (residue_i, residue_j, frame_i, frame_j) = if swapped {
            (second, first, frame_second, frame_first)
        } else {
            (first, second, frame_first, frame_second)
        };
        Self {
            residue_i,
            residue_j,
            finding_order_swapped: swapped,
            bp_type: BasePairType::from_type_id(bp_type_id),
            bp_type_id,
            frame_i,
            frame_j,
            hbonds,
            quality_score,
            descriptors,
            index: None,
        }
    }

    pub fn residue_i(&self) -> usize {
        self.residue_i
    }

    pub fn residue_j(&self) -> usize {
        self.residue_j
    }

    pub fn indices(&self) -> (usize, usize) {
        (self.residue_i, self.residue_j)
    }

    pub fn finding_order_swapped(&self) -> bool {
        self.finding_order_swapped
    }

    pub fn frame_i(&self) -> &ReferenceFrame {
        &self.frame_i
    }

    pub fn frame_j(&self) -> &ReferenceFrame {
        &self.frame_j
    }

    pub fn bp_type(&self) -> BasePairType {
        self.bp_type
    }

    /// `-1` untyped, `1` wobble, `2` Watson-Crick.
    pub fn bp_type_id(&self) -> i32 {
        self.bp_type_id
    }

    /// Hydrogen bonds with donors in `residue_i` and acceptors in `residue_j`.
    pub fn hbonds(&self) -> &[HydrogenBond] {
        &self.hbonds
    }

    /// Score the pair was selected on: validation quality plus the hydrogen-bond
    /// adjustment. Lower is better.
    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }

    pub fn descriptors(&self) -> &PairDescriptors {
        &self.descriptors
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Sets the index used for external reporting.
    pub fn set_index(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn involves(&self, residue: usize) -> bool {
        self.residue_i == residue || self.residue_j == residue
    }
}

impl fmt::Display for BasePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BasePair {{ {}-{}, type: {}, hbonds: {}, score: {:.3} }}",
            self.residue_i,
            self.residue_j,
            self.bp_type,
            self.hbonds.len(),
            self.quality_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Point;
    use nalgebra::Matrix3;

    fn frame_at(x: f64) -> ReferenceFrame {
        ReferenceFrame::new(Matrix3::identity(), Point::new(x, 0.0, 0.0))
    }

    #[test]
    fn hbond_type_char_mapping_round_trips() {
        for kind in [
            HBondType::Standard,
            HBondType::NonStandard,
            HBondType::Invalid,
        ] {
            assert_eq!(HBondType::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(HBondType::from_char('x'), None);
    }

    #[test]
    fn base_pair_type_from_type_id() {
        assert_eq!(BasePairType::from_type_id(2), BasePairType::WatsonCrick);
        assert_eq!(BasePairType::from_type_id(1), BasePairType::Wobble);
        assert_eq!(BasePairType::from_type_id(-1), BasePairType::Unknown);
        assert_eq!(BasePairType::from_type_id(0), BasePairType::Unknown);
    }

    #[test]
    fn base_pair_new_keeps_discovery_order_when_already_canonical() {
        let pair = BasePair::new(
            2,
            7,
            frame_at(2.0),
            frame_at(7.0),
            2,
            Vec::new(),
            -1.0,
            PairDescriptors::default(),
        );

        assert_eq!(pair.indices(), (2, 7));
        assert!(!pair.finding_order_swapped());
        assert_eq!(pair.frame_i().origin().x, 2.0);
        assert_eq!(pair.bp_type(), BasePairType::WatsonCrick);
    }

    #[test]
    fn base_pair_new_swaps_indices_and_frames() {
        let pair = BasePair::new(
            9,
            4,
            frame_at(9.0),
            frame_at(4.0),
            -1,
            Vec::new(),
            3.5,
            PairDescriptors::default(),
        );

        assert_eq!(pair.indices(), (4, 9));
        assert!(pair.finding_order_swapped());
        assert_eq!(pair.frame_i().origin().x, 4.0);
        assert_eq!(pair.frame_j().origin().x, 9.0);
        assert!(pair.involves(9));
        assert!(!pair.involves(5));
    }

    #[test]
    fn base_pair_index_is_only_mutation() {
        let mut pair = BasePair::new(
            0,
            1,
            frame_at(0.0),
            frame_at(1.0),
            1,
            Vec::new(),
            0.0,
            PairDescriptors::default(),
        );

        assert_eq!(pair.index(), None);
        pair.set_index(3);
        assert_eq!(pair.index(), Some(3));
        assert_eq!(pair.bp_type_id(), 1);
        assert_eq!(pair.bp_type(), BasePairType::Wobble);
    }

    #[test]
    fn base_pair_accessors_expose_recorded_values() {
        let bond = HydrogenBond {
            donor: SmolStr::new("O6"),
            acceptor: SmolStr::new("N4"),
            distance: 2.9,
            kind: HBondType::Standard,
            linkage_type: 18,
        };
        let descriptors = PairDescriptors {
            dorg: 0.4,
            dnn: 9.1,
            ..PairDescriptors::default()
        };
        let pair = BasePair::new(
            5,
            6,
            frame_at(5.0),
            frame_at(6.0),
            2,
            vec![bond.clone()],
            -4.6,
            descriptors,
        );

        assert_eq!(pair.hbonds(), &[bond]);
        assert_eq!(pair.quality_score(), -4.6);
        assert_eq!(pair.descriptors().dorg, 0.4);
        assert_eq!(pair.descriptors().dnn, 9.1);
    }

    #[test]
    fn hydrogen_bond_display_uses_type_char() {
        let bond = HydrogenBond {
            donor: SmolStr::new("N1"),
            acceptor: SmolStr::new("N3"),
            distance: 2.912,
            kind: HBondType::Standard,
            linkage_type: 18,
        };

        assert_eq!(format!("{}", bond), "N1-N3 2.91");
    }
}
