use super::atom::Atom;
use super::residue::Residue;
use crate::utils::parallel::*;
use std::fmt;

/// Ordered sequence of residues handed over by the ingestion layer.
///
/// Residue indices used throughout the pairing kernel are positions in this sequence.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    residues: Vec<Residue>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_residues(residues: Vec<Residue>) -> Self {
        Self { residues }
    }

    pub fn add_residue(&mut self, residue: Residue) {
        self.residues.push(residue);
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn residue_mut(&mut self, index: usize) -> Option<&mut Residue> {
        self.residues.get_mut(index)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atom_count()).sum()
    }

    /// Number of residues currently holding a reference frame.
    pub fn framed_count(&self) -> usize {
        self.residues.iter().filter(|r| r.frame().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn iter_residues(&self) -> std::slice::Iter<'_, Residue> {
        self.residues.iter()
    }

    pub fn iter_residues_mut(&mut self) -> std::slice::IterMut<'_, Residue> {
        self.residues.iter_mut()
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|r| r.iter_atoms())
    }

    pub fn par_residues_mut(&mut self) -> impl ParallelIterator<Item = &mut Residue> {
        self.residues.par_iter_mut()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ residues: {}, atoms: {}, framed: {} }}",
            self.residue_count(),
            self.atom_count(),
            self.framed_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Element, MoleculeType, Point};

    fn structure_with_two_residues() -> Structure {
        let mut first = Residue::new("A", 1, "G", MoleculeType::Nucleotide);
        first.add_atom(Atom::new("N9", Element::N, Point::origin()));
        let mut second = Residue::new("B", 12, "C", MoleculeType::Nucleotide);
        second.add_atom(Atom::new("N1", Element::N, Point::new(9.0, 0.0, 0.0)));
        second.add_atom(Atom::new("O2", Element::O, Point::new(8.0, 1.0, 0.0)));
        Structure::from_residues(vec![first, second])
    }

    #[test]
    fn structure_counts_residues_and_atoms() {
        let structure = structure_with_two_residues();

        assert_eq!(structure.residue_count(), 2);
        assert_eq!(structure.atom_count(), 3);
        assert_eq!(structure.framed_count(), 0);
        assert!(!structure.is_empty());
    }

    #[test]
    fn structure_index_lookup_preserves_order() {
        let structure = structure_with_two_residues();

        assert_eq!(structure.residue(0).unwrap().name, "G");
        assert_eq!(structure.residue(1).unwrap().id, 12);
        assert!(structure.residue(2).is_none());
    }

    #[test]
    fn par_residues_mut_visits_every_residue() {
        let mut structure = structure_with_two_residues();

        structure
            .par_residues_mut()
            .for_each(|residue| residue.insertion_code = Some('A'));

        assert!(
            structure
                .iter_residues()
                .all(|r| r.insertion_code == Some('A'))
        );
    }

    #[test]
    fn structure_display_reports_counts() {
        let structure = structure_with_two_residues();

        assert_eq!(
            format!("{}", structure),
            "Structure { residues: 2, atoms: 3, framed: 0 }"
        );
    }
}
