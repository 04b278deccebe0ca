//! Atom representation consumed by the pairing kernel.
//!
//! Atoms carry the PDB-style name used for template matching and hydrogen-bond typing, the
//! element used by donor/acceptor predicates, and a Cartesian position in ångströms.

use super::types::{Element, Point};
use nalgebra::Vector3;
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with element identity and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name with surrounding whitespace removed (e.g., `N9`, `C1'`).
    pub name: SmolStr,
    /// Chemical element.
    pub element: Element,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
}

impl Atom {
    /// Creates a new atom from a name, element, and position.
    ///
    /// The name is trimmed so that fixed-width labels such as `" N9 "` compare equal to
    /// their template counterparts.
    pub fn new(name: &str, element: Element, pos: Point) -> Self {
        Self {
            name: SmolStr::new(name.trim()),
            element,
            pos,
        }
    }

    /// Computes the squared Euclidean distance to another atom.
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }

    /// Computes the Euclidean distance to another atom in ångströms.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }

    /// Translates the atom by an arbitrary vector.
    pub fn translate_by(&mut self, vector: &Vector3<f64>) {
        self.pos += vector;
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ name: \"{}\", element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
            self.name, self.element, self.pos.x, self.pos.y, self.pos.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_new_trims_fixed_width_names() {
        let atom = Atom::new(" N9 ", Element::N, Point::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "N9");
        assert_eq!(atom.element, Element::N);
    }

    #[test]
    fn atom_distance_calculates_correctly() {
        let a = Atom::new("O6", Element::O, Point::new(0.0, 0.0, 0.0));
        let b = Atom::new("N4", Element::N, Point::new(3.0, 4.0, 0.0));

        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-10);
        assert!((a.distance(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn atom_translate_by_accumulates() {
        let mut atom = Atom::new("C8", Element::C, Point::origin());

        atom.translate_by(&Vector3::new(1.0, 0.0, 0.0));
        atom.translate_by(&Vector3::new(0.0, -2.0, 0.5));

        assert_eq!(atom.pos, Point::new(1.0, -2.0, 0.5));
    }

    #[test]
    fn atom_display_formats_correctly() {
        let atom = Atom::new("C1'", Element::C, Point::new(1.234, -5.678, 9.012));

        assert_eq!(
            format!("{}", atom),
            "Atom { name: \"C1'\", element: C, pos: [1.234, -5.678, 9.012] }"
        );
    }
}
