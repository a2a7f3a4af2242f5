use super::ids::ChainId;
use nalgebra::Point3;
use std::hash::{Hash, Hasher};

/// Represents a single atom of a structure under cross-link prediction.
///
/// Identity fields are fixed at ingestion time. The two flags are the only state
/// the prediction engine mutates: `externally_bonded` once the atom takes part in a
/// committed cross-link, and `paired` once radical assignment has resolved it.
///
/// Equality and hashing use the serial number alone.
#[derive(Debug, Clone)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The atom name (e.g., "C1", "CX3", "N6").
    pub name: String,
    /// The element symbol (e.g., "C", "N").
    pub element: String,
    /// The residue sequence number identifying the owning chain in the source file.
    pub residue_seq: isize,
    /// The ID of the chain this atom belongs to.
    pub chain_id: ChainId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Whether the atom participates in a committed cross-link.
    pub externally_bonded: bool,
    /// Whether radical assignment has already consumed this atom.
    pub paired: bool,
}

impl Atom {
    /// Creates a new, unbonded `Atom`.
    ///
    /// The owning chain and residue sequence number are assigned when the atom is
    /// inserted into a [`Structure`](super::structure::Structure).
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The atom name.
    /// * `element` - The element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(serial: usize, name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: element.to_string(),
            residue_seq: 0,
            chain_id: ChainId::default(),
            position,
            externally_bonded: false,
            paired: false,
        }
    }

    /// Returns the Euclidean distance to another atom.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Returns the character encoding the atom's position within its functional group.
    ///
    /// This is the second character of the atom name (`'X'` for `"CX3"`, `'6'` for `"N6"`).
    pub fn position_code(&self) -> Option<char> {
        self.name.chars().nth(1)
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serial.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_atom_starts_unbonded_and_unpaired() {
        let atom = Atom::new(7, "CX3", "C", Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.serial, 7);
        assert_eq!(atom.name, "CX3");
        assert_eq!(atom.element, "C");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!atom.externally_bonded);
        assert!(!atom.paired);
    }

    #[test]
    fn atoms_with_same_serial_are_equal_regardless_of_other_fields() {
        let a = Atom::new(3, "C1", "C", Point3::origin());
        let mut b = Atom::new(3, "N1", "N", Point3::new(5.0, 0.0, 0.0));
        b.externally_bonded = true;

        assert_eq!(a, b);
        let set: HashSet<Atom> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn atoms_with_different_serials_are_distinct() {
        let a = Atom::new(1, "C1", "C", Point3::origin());
        let b = Atom::new(2, "C1", "C", Point3::origin());
        assert_ne!(a, b);
    }

    #[test]
    fn distance_to_is_euclidean() {
        let a = Atom::new(1, "C1", "C", Point3::new(0.0, 0.0, 0.0));
        let b = Atom::new(2, "C2", "C", Point3::new(3.0, 4.0, 0.0));
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn position_code_is_second_character_of_name() {
        assert_eq!(
            Atom::new(1, "CX3", "C", Point3::origin()).position_code(),
            Some('X')
        );
        assert_eq!(
            Atom::new(2, "N6", "N", Point3::origin()).position_code(),
            Some('6')
        );
        assert_eq!(Atom::new(3, "N", "N", Point3::origin()).position_code(), None);
    }
}
