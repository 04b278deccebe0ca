use nalgebra::Point3;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

/// Chemical elements that occur in nucleic-acid structures and their usual companions.
///
/// Anything outside this set is carried as [`Element::Unknown`]; the pairing kernel only
/// distinguishes hydrogens and the hydrogen-bonding elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Element {
    H,
    C,
    N,
    O,
    P,
    S,
    Se,
    Mg,
    Na,
    K,
    Cl,
    Unknown,
}

/// Broad classification of a residue as reported by the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoleculeType {
    Nucleotide,
    AminoAcid,
    Water,
    Ion,
    Ligand,
    Unknown,
}

/// Ring topology of a nucleobase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingKind {
    /// Fused six- and five-membered rings (A, G, I).
    Purine,
    /// Single six-membered ring (C, T, U).
    Pyrimidine,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::P => "P",
            Element::S => "S",
            Element::Se => "Se",
            Element::Mg => "Mg",
            Element::Na => "Na",
            Element::K => "K",
            Element::Cl => "Cl",
            Element::Unknown => "Unknown",
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" | "D" => Ok(Element::H),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "SE" => Ok(Element::Se),
            "MG" => Ok(Element::Mg),
            "NA" => Ok(Element::Na),
            "K" => Ok(Element::K),
            "CL" => Ok(Element::Cl),
            _ => Err(format!("Invalid element symbol: {}", s)),
        }
    }
}

impl MoleculeType {
    pub fn name(&self) -> &'static str {
        match self {
            MoleculeType::Nucleotide => "Nucleotide",
            MoleculeType::AminoAcid => "Amino Acid",
            MoleculeType::Water => "Water",
            MoleculeType::Ion => "Ion",
            MoleculeType::Ligand => "Ligand",
            MoleculeType::Unknown => "Unknown",
        }
    }

    /// Whether the ring atoms must be inspected before the residue can be trusted as a base.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MoleculeType::Unknown | MoleculeType::AminoAcid)
    }
}

impl fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MoleculeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Nucleotide" => Ok(MoleculeType::Nucleotide),
            "AminoAcid" => Ok(MoleculeType::AminoAcid),
            "Water" => Ok(MoleculeType::Water),
            "Ion" => Ok(MoleculeType::Ion),
            "Ligand" => Ok(MoleculeType::Ligand),
            "Unknown" => Ok(MoleculeType::Unknown),
            _ => Err(format!("Invalid molecule type: {}", s)),
        }
    }
}

impl RingKind {
    /// Ring kind implied by a one-letter base code, if the code names a standard base.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'A' | 'G' | 'I' => Some(RingKind::Purine),
            'C' | 'T' | 'U' | 'P' => Some(RingKind::Pyrimidine),
            _ => None,
        }
    }

    /// Name of the ring nitrogen bonded to the sugar (N9 or N1).
    pub fn glycosidic_nitrogen(&self) -> &'static str {
        match self {
            RingKind::Purine => "N9",
            RingKind::Pyrimidine => "N1",
        }
    }

    /// Number of ring atoms in the legacy ring atom list.
    pub fn ring_size(&self) -> usize {
        match self {
            RingKind::Purine => 9,
            RingKind::Pyrimidine => 6,
        }
    }
}

impl fmt::Display for RingKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RingKind::Purine => write!(f, "Purine"),
            RingKind::Pyrimidine => write!(f, "Pyrimidine"),
        }
    }
}
