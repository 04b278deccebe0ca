use super::atom::Atom;
use super::frame::{FrameSlot, ReferenceFrame};
use super::types::{MoleculeType, RingKind};
use std::fmt;

/// Identity of a nucleobase established alongside its reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseIdentity {
    /// One-letter code; lowercase marks a modified base.
    pub code: char,
    /// Ring topology actually used for fitting (may differ from the code after
    /// purine-to-pyrimidine reclassification).
    pub ring: RingKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub chain_id: String,
    pub id: i32,
    pub insertion_code: Option<char>,
    pub name: String,
    pub molecule_type: MoleculeType,
    atoms: Vec<Atom>,
    frame: FrameSlot,
    base: Option<BaseIdentity>,
}

impl Residue {
    pub fn new(chain_id: &str, id: i32, name: &str, molecule_type: MoleculeType) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            id,
            insertion_code: None,
            name: name.trim().to_string(),
            molecule_type,
            atoms: Vec::new(),
            frame: FrameSlot::Unset,
            base: None,
        }
    }

    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            self.atom(&atom.name).is_none(),
            "Attempted to add a duplicate atom name '{}' to residue '{}'",
            atom.name,
            self.name
        );
        self.atoms.push(atom);
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom(name).is_some()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn iter_atoms_mut(&mut self) -> std::slice::IterMut<'_, Atom> {
        self.atoms.iter_mut()
    }

    pub fn frame_slot(&self) -> &FrameSlot {
        &self.frame
    }

    pub fn frame(&self) -> Option<&ReferenceFrame> {
        self.frame.get()
    }

    pub fn base(&self) -> Option<BaseIdentity> {
        self.base
    }

    /// One-letter base code, or `'?'` when the residue has not been identified.
    pub fn base_code(&self) -> char {
        self.base.map_or('?', |b| b.code)
    }

    /// Stores a frame and the base identity it was fitted with.
    pub fn assign_frame(&mut self, frame: ReferenceFrame, base: BaseIdentity) {
        self.frame = FrameSlot::Set(frame);
        self.base = Some(base);
    }

    pub fn clear_frame(&mut self) {
        self.frame = FrameSlot::Unset;
        self.base = None;
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let icode = self.insertion_code.map(String::from).unwrap_or_default();
        write!(
            f,
            "Residue {{ chain: {}, id: {}{}, name: \"{}\", type: {}, atoms: {} }}",
            self.chain_id,
            self.id,
            icode,
            self.name,
            self.molecule_type,
            self.atom_count()
        )
    }
}
