//! Residue-name lookups used to identify nucleobases.
//!
//! The registry answers two questions for a residue name: which one-letter base code it
//! stands for (uppercase for the standard bases, lowercase for modified ones), and whether
//! the name is known to be something other than a nucleotide. It is an ordinary value
//! passed by reference, so callers can extend it without touching any global state.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct BaseRegistry {
    codes: HashMap<String, char>,
    excluded: HashSet<String>,
}

impl BaseRegistry {
    pub fn new_default() -> Self {
        let mut codes = HashMap::new();
        let mut excluded = HashSet::new();

        macro_rules! register_standard {
            ($name:expr, $code:expr) => {
                codes.insert($name.to_string(), $code);
            };
        }

        macro_rules! register_modified {
            ($name:expr, $parent:expr) => {
                codes.insert($name.to_string(), $parent.to_ascii_lowercase());
            };
        }

        macro_rules! register_excluded {
            ($($name:expr),+ $(,)?) => {
                $(excluded.insert($name.to_string());)+
            };
        }

        register_standard!("A", 'A');
        register_standard!("C", 'C');
        register_standard!("G", 'G');
        register_standard!("T", 'T');
        register_standard!("U", 'U');
        register_standard!("I", 'I');

        register_standard!("DA", 'A');
        register_standard!("DC", 'C');
        register_standard!("DG", 'G');
        register_standard!("DT", 'T');
        register_standard!("DU", 'U');
        register_standard!("DI", 'I');

        register_standard!("RA", 'A');
        register_standard!("RC", 'C');
        register_standard!("RG", 'G');
        register_standard!("RU", 'U');

        register_standard!("ADE", 'A');
        register_standard!("CYT", 'C');
        register_standard!("GUA", 'G');
        register_standard!("THY", 'T');
        register_standard!("URA", 'U');
        register_standard!("URI", 'U');
        register_standard!("INO", 'I');

        register_modified!("1MA", 'A');
        register_modified!("6MA", 'A');
        register_modified!("A2M", 'A');
        register_modified!("MIA", 'A');
        register_modified!("T6A", 'A');
        register_modified!("ATP", 'A');

        register_modified!("5MC", 'C');
        register_modified!("5CM", 'C');
        register_modified!("OMC", 'C');
        register_modified!("CBR", 'C');
        register_modified!("CCC", 'C');
        register_modified!("4OC", 'C');

        register_modified!("1MG", 'G');
        register_modified!("2MG", 'G');
        register_modified!("7MG", 'G');
        register_modified!("M2G", 'G');
        register_modified!("OMG", 'G');
        register_modified!("YG", 'G');
        register_modified!("GTP", 'G');
        register_modified!("GDP", 'G');
        register_modified!("8OG", 'G');

        register_modified!("5MU", 'T');

        register_modified!("PSU", 'U');
        register_modified!("H2U", 'U');
        register_modified!("DHU", 'U');
        register_modified!("OMU", 'U');
        register_modified!("4SU", 'U');
        register_modified!("5BU", 'U');
        register_modified!("UR3", 'U');

        register_excluded!("HOH", "WAT", "H2O", "DOD", "SOL");
        register_excluded!("MG", "NA", "K", "CL", "CA", "ZN", "MN", "SR", "BA", "CO", "CD");
        register_excluded!("SO4", "PO4", "ACT", "GOL", "EDO", "PEG", "MPD", "TRS", "NH4");
        register_excluded!(
            "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS",
            "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
        );

        Self { codes, excluded }
    }

    /// A registry with no names, for callers that register everything themselves.
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
            excluded: HashSet::new(),
        }
    }

    /// Maps a residue name to a one-letter base code.
    ///
    /// Lowercase codes denote modified bases. Lookup ignores surrounding whitespace and
    /// letter case of the residue name.
    pub fn register(&mut self, residue_name: &str, code: char) {
        self.codes.insert(normalize(residue_name), code);
    }

    pub fn exclude(&mut self, residue_name: &str) {
        self.excluded.insert(normalize(residue_name));
    }

    pub fn one_letter_code(&self, residue_name: &str) -> Option<char> {
        self.codes.get(&normalize(residue_name)).copied()
    }

    pub fn is_excluded(&self, residue_name: &str) -> bool {
        self.excluded.contains(&normalize(residue_name))
    }

    /// `Some(true)` for modified bases, `None` for unknown names.
    pub fn is_modified(&self, residue_name: &str) -> Option<bool> {
        self.one_letter_code(residue_name).map(|c| c.is_ascii_lowercase())
    }
}

impl Default for BaseRegistry {
    fn default() -> Self {
        Self::new_default()
    }
}

fn normalize(residue_name: &str) -> String {
    residue_name.trim().to_ascii_uppercase()
}
