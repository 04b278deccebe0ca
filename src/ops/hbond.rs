//! Hydrogen-bond detection between two residues.
//!
//! Candidates are every N/O atom pair within distance limits. Competing candidates that
//! share an atom are resolved by a fixed left-to-right scan: a candidate is accepted when
//! it is the shortest one for both its donor and its acceptor among the candidates still
//! in play, after which everything sharing either atom leaves play and the scan restarts.
//! During resolution the sign of `distance` marks acceptance (negative = accepted).
//! Accepted bonds are then typed from the donor/acceptor roles of their atoms and
//! filtered. The scan order is part of the result: the same ordered candidates always
//! resolve the same way.

use crate::model::pair::{HBondType, HydrogenBond};
use crate::model::residue::Residue;
use crate::ops::config::HBondConfig;

/// Linkage value carried by candidates accepted in the first pass.
pub const ISOLATED_LINKAGE: i32 = 18;

const GOOD_HB: (f64, f64) = (2.5, 3.5);
const MAX_HB_WITH_GOOD: f64 = 3.6;
const NONSTANDARD_HB: (f64, f64) = (2.6, 3.2);

const BACKBONE_OXYGENS: [&str; 7] = ["OP1", "OP2", "O1P", "O2P", "O3'", "O4'", "O5'"];

/// Role pairs (atom of residue i, atom of residue j) that make a standard bond.
const STANDARD_ROLE_PAIRS: [&str; 7] = ["AD", "AX", "XD", "XX", "DA", "DX", "XA"];

/// Bonds found between two residues.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HBondResult {
    pub bonds: Vec<HydrogenBond>,
    /// Standard bonds with a distance in `[2.5, 3.5]`.
    pub num_good_hb: usize,
}

pub struct HydrogenBondFinder<'a> {
    config: &'a HBondConfig,
}

impl<'a> HydrogenBondFinder<'a> {
    pub fn new(config: &'a HBondConfig) -> Self {
        Self { config }
    }

    /// Finds the hydrogen bonds between `residue_i` and `residue_j`.
    ///
    /// Bond `donor` names are atoms of `residue_i`, `acceptor` names atoms of
    /// `residue_j`. Base codes are read from the residues' base identities.
    pub fn find(&self, residue_i: &Residue, residue_j: &Residue) -> HBondResult {
        let mut bonds = self.candidates(residue_i, residue_j);
        if bonds.is_empty() {
            return HBondResult::default();
        }

        resolve_conflicts(&mut bonds);
        assign_linkage(&mut bonds, self.config.lower, self.config.dist2);
        classify(&mut bonds, residue_i.base_code(), residue_j.base_code());
        filter(&mut bonds);

        bonds.retain(|b| b.kind != HBondType::Invalid);
        let num_good_hb = count_good(&bonds);
        log::trace!(
            "{} hydrogen bonds ({} good) between {}{} and {}{}",
            bonds.len(),
            num_good_hb,
            residue_i.name,
            residue_i.id,
            residue_j.name,
            residue_j.id
        );

        HBondResult { bonds, num_good_hb }
    }

    /// Atom pairs passing the element and distance checks, in atom order.
    pub fn candidates(&self, residue_i: &Residue, residue_j: &Residue) -> Vec<HydrogenBond> {
        let mut out = Vec::new();
        for a in residue_i.iter_atoms() {
            if !self.config.allows(a.element) {
                continue;
            }
            for b in residue_j.iter_atoms() {
                if !self.config.allows(b.element) || both_backbone_oxygens(&a.name, &b.name) {
                    continue;
                }
                let distance = a.distance(b);
                if distance >= self.config.lower && distance <= self.config.dist1 {
                    out.push(HydrogenBond {
                        donor: a.name.clone(),
                        acceptor: b.name.clone(),
                        distance,
                        kind: HBondType::Invalid,
                        linkage_type: 0,
                    });
                }
            }
        }
        out
    }

    /// Counts candidate pairs whose atoms both belong to the bases.
    pub fn count_base_candidates(&self, residue_i: &Residue, residue_j: &Residue) -> usize {
        self.candidates(residue_i, residue_j)
            .iter()
            .filter(|c| is_base_atom(&c.donor) && is_base_atom(&c.acceptor))
            .count()
    }
}

/// Marks accepted candidates by negating their distance.
///
/// Expects every distance to be positive on entry.
pub fn resolve_conflicts(bonds: &mut [HydrogenBond]) {
    let n = bonds.len();
    let mut matched = vec![false; n];
    let mut cursor = 0;

    while cursor < n {
        if matched[cursor] {
            cursor += 1;
            continue;
        }

        let donor = bonds[cursor].donor.clone();
        let acceptor = bonds[cursor].acceptor.clone();
        let by_donor = shortest_sharing(bonds, &matched, cursor, |b| b.donor == donor);
        let by_acceptor = shortest_sharing(bonds, &matched, cursor, |b| b.acceptor == acceptor);

        if by_donor == by_acceptor {
            let k = by_donor;
            bonds[k].distance = -bonds[k].distance;
            let (kd, ka) = (bonds[k].donor.clone(), bonds[k].acceptor.clone());
            for m in 0..n {
                if !matched[m] && (bonds[m].donor == kd || bonds[m].acceptor == ka) {
                    matched[m] = true;
                }
            }
            cursor = 0;
        } else {
            cursor += 1;
        }
    }
}

/// Index of the shortest unmatched candidate satisfying `shares`, starting from `cursor`.
///
/// Only strictly shorter candidates replace the current best, so ties keep the earlier
/// choice.
fn shortest_sharing(
    bonds: &[HydrogenBond],
    matched: &[bool],
    cursor: usize,
    shares: impl Fn(&HydrogenBond) -> bool,
) -> usize {
    let mut best = cursor;
    let mut best_distance = bonds[cursor].distance;
    for (m, bond) in bonds.iter().enumerate() {
        if m != cursor && !matched[m] && shares(bond) && bond.distance < best_distance {
            best = m;
            best_distance = bond.distance;
        }
    }
    best
}

/// Sets `linkage_type` and promotes shared candidates within `[lower, dist2]`.
pub fn assign_linkage(bonds: &mut [HydrogenBond], lower: f64, dist2: f64) {
    let n = bonds.len();
    let mut tags = vec![[0i32; 2]; n];

    for k in 0..n {
        if bonds[k].distance >= 0.0 {
            continue;
        }
        tags[k] = [9, 9];
        for m in 0..n {
            if m == k || bonds[m].distance <= 0.0 {
                continue;
            }
            if bonds[m].donor == bonds[k].donor {
                tags[m][0] = 1;
            }
            if bonds[m].acceptor == bonds[k].acceptor {
                tags[m][1] = 1;
            }
        }
    }

    for (bond, tag) in bonds.iter_mut().zip(&tags) {
        bond.linkage_type = tag[0] + tag[1];
        if bond.distance > 0.0
            && bond.linkage_type != ISOLATED_LINKAGE
            && bond.distance >= lower
            && bond.distance <= dist2
        {
            bond.distance = -bond.distance;
        }
    }
}

/// Types accepted bonds and restores positive distances.
pub fn classify(bonds: &mut [HydrogenBond], base_i: char, base_j: char) {
    for bond in bonds.iter_mut() {
        if bond.distance >= 0.0 {
            bond.kind = HBondType::Invalid;
            continue;
        }
        bond.distance = bond.distance.abs();
        let roles = [
            atom_role(base_i, &bond.donor),
            atom_role(base_j, &bond.acceptor),
        ];
        let pair: String = roles.iter().collect();
        bond.kind = if STANDARD_ROLE_PAIRS.contains(&pair.as_str()) {
            HBondType::Standard
        } else {
            HBondType::NonStandard
        };
    }
}

/// Drops long and doubtful bonds once at least one good standard bond exists.
pub fn filter(bonds: &mut [HydrogenBond]) {
    if count_good(bonds) == 0 {
        return;
    }
    for bond in bonds.iter_mut() {
        if bond.kind == HBondType::Invalid {
            continue;
        }
        if bond.distance > MAX_HB_WITH_GOOD {
            bond.kind = HBondType::Invalid;
        } else if bond.kind == HBondType::NonStandard
            && bond.linkage_type != ISOLATED_LINKAGE
            && !(bond.distance >= NONSTANDARD_HB.0 && bond.distance <= NONSTANDARD_HB.1)
        {
            bond.kind = HBondType::Invalid;
        }
    }
}

fn count_good(bonds: &[HydrogenBond]) -> usize {
    bonds
        .iter()
        .filter(|b| {
            b.kind == HBondType::Standard && b.distance >= GOOD_HB.0 && b.distance <= GOOD_HB.1
        })
        .count()
}

fn both_backbone_oxygens(a: &str, b: &str) -> bool {
    BACKBONE_OXYGENS.contains(&a) && BACKBONE_OXYGENS.contains(&b)
}

/// Whether `name` is a nucleobase atom (ring atoms, exocyclic substituents, and the
/// thymine methyl).
pub fn is_base_atom(name: &str) -> bool {
    if name == "C5M" || name == "C7" {
        return true;
    }
    let bytes = name.as_bytes();
    bytes.len() == 2 && matches!(bytes[0], b'C' | b'N' | b'O') && bytes[1].is_ascii_digit()
}

/// Hydrogen-bonding role of an atom: `'A'` acceptor, `'D'` donor, `'X'` either, `'?'`
/// unknown.
pub fn atom_role(base: char, atom_name: &str) -> char {
    match atom_name {
        "OP1" | "O1P" | "OP2" | "O2P" | "O5'" | "O4'" | "O3'" => return 'A',
        "O2'" => return 'X',
        _ => {}
    }

    match (base.to_ascii_uppercase(), atom_name) {
        ('A', "N9") | ('G', "N9") | ('I', "N9") => '?',
        ('A', "N7") | ('A', "N1") | ('A', "N3") => 'A',
        ('A', "N6") => 'D',
        ('C', "N1") => '?',
        ('C', "O2") | ('C', "N3") => 'A',
        ('C', "N4") => 'D',
        ('G', "N7") | ('G', "O6") | ('G', "N3") => 'A',
        ('G', "N1") | ('G', "N2") => 'D',
        ('I', "N7") | ('I', "O6") | ('I', "N3") => 'A',
        ('I', "N1") => 'D',
        ('T', "N1") | ('U', "N1") => '?',
        ('T', "O2") | ('T', "O4") | ('U', "O2") | ('U', "O4") => 'A',
        ('T', "N3") | ('U', "N3") => 'D',
        _ => '?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::frame::ReferenceFrame;
    use crate::model::residue::BaseIdentity;
    use crate::model::types::{Element, MoleculeType, Point, RingKind};
    use smol_str::SmolStr;

    fn candidate(donor: &str, acceptor: &str, distance: f64) -> HydrogenBond {
        HydrogenBond {
            donor: SmolStr::new(donor),
            acceptor: SmolStr::new(acceptor),
            distance,
            kind: HBondType::Invalid,
            linkage_type: 0,
        }
    }

    fn base_residue(
        name: &str,
        code: char,
        ring: RingKind,
        atoms: &[(&str, Element, [f64; 3])],
    ) -> Residue {
        let mut residue = Residue::new("A", 1, name, MoleculeType::Nucleotide);
        for (atom_name, element, [x, y, z]) in atoms {
            residue.add_atom(Atom::new(atom_name, *element, Point::new(*x, *y, *z)));
        }
        residue.assign_frame(ReferenceFrame::identity(), BaseIdentity { code, ring });
        residue
    }

    fn guanine() -> Residue {
        base_residue(
            "G",
            'G',
            RingKind::Purine,
            &[
                ("C1'", Element::C, [-2.477, 5.399, 0.0]),
                ("N9", Element::N, [-1.289, 4.551, 0.0]),
                ("C8", Element::C, [0.023, 4.962, 0.0]),
                ("N7", Element::N, [0.870, 3.969, 0.0]),
                ("C5", Element::C, [0.071, 2.833, 0.0]),
                ("C6", Element::C, [0.424, 1.460, 0.0]),
                ("O6", Element::O, [1.554, 0.955, 0.0]),
                ("N1", Element::N, [-0.700, 0.641, 0.0]),
                ("C2", Element::C, [-1.999, 1.087, 0.0]),
                ("N2", Element::N, [-2.949, 0.139, -0.001]),
                ("N3", Element::N, [-2.342, 2.364, 0.001]),
                ("C4", Element::C, [-1.265, 3.177, 0.0]),
            ],
        )
    }

    /// Cytosine mirrored through the x axis so that it faces the guanine above.
    fn cytosine() -> Residue {
        base_residue(
            "C",
            'C',
            RingKind::Pyrimidine,
            &[
                ("C1'", Element::C, [-2.477, -5.402, 0.0]),
                ("N1", Element::N, [-1.285, -4.542, 0.0]),
                ("C2", Element::C, [-1.472, -3.158, 0.0]),
                ("O2", Element::O, [-2.628, -2.709, -0.001]),
                ("N3", Element::N, [-0.391, -2.344, 0.0]),
                ("C4", Element::C, [0.837, -2.868, 0.0]),
                ("N4", Element::N, [1.875, -2.027, -0.001]),
                ("C5", Element::C, [1.056, -4.275, 0.0]),
                ("C6", Element::C, [-0.023, -5.068, 0.0]),
            ],
        )
    }

    #[test]
    fn watson_crick_gc_yields_three_standard_bonds() {
        let config = HBondConfig::default();
        let finder = HydrogenBondFinder::new(&config);

        let result = finder.find(&guanine(), &cytosine());

        let pairs: Vec<(&str, &str)> = result
            .bonds
            .iter()
            .map(|b| (b.donor.as_str(), b.acceptor.as_str()))
            .collect();
        assert_eq!(pairs, vec![("O6", "N4"), ("N1", "N3"), ("N2", "O2")]);
        assert!(result.bonds.iter().all(|b| b.kind == HBondType::Standard));
        assert!(result.bonds.iter().all(|b| b.linkage_type == ISOLATED_LINKAGE));
        assert!(result.bonds.iter().all(|b| b.distance > 0.0));
        assert!((result.bonds[0].distance - 3.0).abs() < 0.01);
        assert!((result.bonds[2].distance - 2.866).abs() < 0.01);
        assert_eq!(result.num_good_hb, 3);
    }

    #[test]
    fn candidates_respect_limits_and_elements() {
        let config = HBondConfig::default();
        let finder = HydrogenBondFinder::new(&config);

        let candidates = finder.candidates(&guanine(), &cytosine());

        assert_eq!(candidates.len(), 7);
        for c in &candidates {
            assert!(c.distance >= 1.8 && c.distance <= 4.0);
            assert!(!c.donor.starts_with('C') && !c.acceptor.starts_with('C'));
        }
        assert_eq!(finder.count_base_candidates(&guanine(), &cytosine()), 7);
    }

    #[test]
    fn shared_donor_marks_exactly_one_conflict() {
        let mut bonds = vec![candidate("N1", "O2", 3.1), candidate("N1", "N3", 2.9)];

        resolve_conflicts(&mut bonds);

        let conflicted: Vec<usize> = (0..bonds.len())
            .filter(|&i| bonds[i].distance < 0.0)
            .collect();
        assert_eq!(conflicted, vec![1]);
        assert_eq!(bonds[0].distance, 3.1);
    }

    #[test]
    fn conflict_resolution_is_deterministic() {
        let template = vec![
            candidate("O6", "N3", 3.2),
            candidate("O6", "N4", 2.9),
            candidate("N1", "N3", 2.9),
            candidate("N1", "O2", 3.4),
            candidate("N2", "O2", 2.8),
        ];
        let mut first = template.clone();
        let mut second = template.clone();

        resolve_conflicts(&mut first);
        resolve_conflicts(&mut second);

        assert_eq!(first, second);
        let accepted: Vec<usize> = (0..first.len())
            .filter(|&i| first[i].distance < 0.0)
            .collect();
        assert_eq!(accepted, vec![1, 2, 4]);
    }

    #[test]
    fn equal_distances_keep_scan_order() {
        let mut bonds = vec![candidate("N1", "O2", 3.0), candidate("N1", "N3", 3.0)];

        resolve_conflicts(&mut bonds);

        assert!(bonds[0].distance < 0.0);
        assert!(bonds[1].distance > 0.0);
    }

    #[test]
    fn linkage_tags_shared_atoms() {
        let mut bonds = vec![
            candidate("N1", "N3", -2.9),
            candidate("N1", "O2", 3.4),
            candidate("N2", "N3", 3.3),
            candidate("O6", "N4", 3.5),
        ];

        assign_linkage(&mut bonds, 1.8, 0.0);

        assert_eq!(bonds[0].linkage_type, 18);
        assert_eq!(bonds[1].linkage_type, 1);
        assert_eq!(bonds[2].linkage_type, 1);
        assert_eq!(bonds[3].linkage_type, 0);
        assert!(bonds[1].distance > 0.0);
    }

    #[test]
    fn second_pass_promotes_shared_candidates_within_dist2() {
        let mut bonds = vec![candidate("N1", "N3", -2.9), candidate("N1", "O2", 3.0)];

        assign_linkage(&mut bonds, 1.8, 3.1);

        assert!(bonds[1].distance < 0.0);
        assert_eq!(bonds[1].linkage_type, 1);
    }

    #[test]
    fn classify_uses_donor_acceptor_roles() {
        let mut bonds = vec![
            candidate("N6", "O4", -2.9),
            candidate("N1", "N1", -3.0),
            candidate("N7", "N3", 3.0),
        ];

        classify(&mut bonds, 'A', 'U');

        assert_eq!(bonds[0].kind, HBondType::Standard);
        assert_eq!(bonds[1].kind, HBondType::NonStandard);
        assert_eq!(bonds[2].kind, HBondType::Invalid);
        assert!(bonds.iter().all(|b| b.distance > 0.0));
    }

    #[test]
    fn filter_drops_long_and_doubtful_bonds_when_good_bond_exists() {
        let mut bonds = vec![
            HydrogenBond {
                kind: HBondType::Standard,
                linkage_type: 18,
                ..candidate("N1", "N3", 2.9)
            },
            HydrogenBond {
                kind: HBondType::Standard,
                linkage_type: 18,
                ..candidate("N6", "O4", 3.8)
            },
            HydrogenBond {
                kind: HBondType::NonStandard,
                linkage_type: 1,
                ..candidate("N7", "O2", 3.4)
            },
            HydrogenBond {
                kind: HBondType::NonStandard,
                linkage_type: 18,
                ..candidate("C2", "O2", 3.4)
            },
        ];

        filter(&mut bonds);

        let kinds: Vec<HBondType> = bonds.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                HBondType::Standard,
                HBondType::Invalid,
                HBondType::Invalid,
                HBondType::NonStandard
            ]
        );
    }

    #[test]
    fn filter_is_skipped_without_good_bond() {
        let mut bonds = vec![HydrogenBond {
            kind: HBondType::Standard,
            linkage_type: 18,
            ..candidate("N6", "O4", 3.8)
        }];

        filter(&mut bonds);

        assert_eq!(bonds[0].kind, HBondType::Standard);
    }

    #[test]
    fn empty_candidates_give_empty_result() {
        let config = HBondConfig::default();
        let finder = HydrogenBondFinder::new(&config);
        let far = base_residue(
            "A",
            'A',
            RingKind::Purine,
            &[("N1", Element::N, [50.0, 0.0, 0.0])],
        );

        let result = finder.find(&guanine(), &far);

        assert!(result.bonds.is_empty());
        assert_eq!(result.num_good_hb, 0);
    }

    #[test]
    fn backbone_oxygen_pairs_are_skipped() {
        let config = HBondConfig::default();
        let finder = HydrogenBondFinder::new(&config);
        let mut first = Residue::new("A", 1, "A", MoleculeType::Nucleotide);
        first.add_atom(Atom::new("OP1", Element::O, Point::origin()));
        first.add_atom(Atom::new("O2'", Element::O, Point::new(0.0, 1.0, 0.0)));
        let mut second = Residue::new("A", 2, "U", MoleculeType::Nucleotide);
        second.add_atom(Atom::new("O5'", Element::O, Point::new(3.0, 0.0, 0.0)));

        let candidates = finder.candidates(&first, &second);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].donor, "O2'");
    }

    #[test]
    fn base_atom_names() {
        for name in ["N1", "C2", "O6", "N4", "C5M", "C7"] {
            assert!(is_base_atom(name), "{name}");
        }
        for name in ["C1'", "P", "OP1", "H1", "N", "O2'"] {
            assert!(!is_base_atom(name), "{name}");
        }
    }

    #[test]
    fn atom_roles_follow_base_chemistry() {
        assert_eq!(atom_role('G', "N1"), 'D');
        assert_eq!(atom_role('g', "O6"), 'A');
        assert_eq!(atom_role('C', "N4"), 'D');
        assert_eq!(atom_role('U', "N1"), '?');
        assert_eq!(atom_role('A', "OP1"), 'A');
        assert_eq!(atom_role('?', "O2'"), 'X');
        assert_eq!(atom_role('?', "N1"), '?');
    }
}
