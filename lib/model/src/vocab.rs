//! Vocabulary of the transition-metal-complex (TMC) graphs.
//!
//! Only the IRIs used by the built-in compression rules, label hierarchy and content rules are
//! listed here.

/// The root of all TMC vocabulary IRIs.
pub const ROOT: &str = "resource://integreat/p5/";

/// Predicates and classes of transition-metal complexes.
pub mod complex {
    use oxrdf::NamedNodeRef;

    /// Relates a complex to its metal centre.
    pub const HAS_METAL_CENTRE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/complex/TMC/hasMetalCentre");
    /// Relates a complex to one of its ligands.
    pub const HAS_LIGAND: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/complex/TMC/hasLigand");
    /// The class of all transition-metal complexes.
    pub const TRANSITION_METAL_COMPLEX: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "resource://integreat/p5/complex/TMC/TransitionMetalComplex",
    );
}

/// Predicates and classes of ligands, metal centres and ligand bonds.
pub mod ligand {
    use oxrdf::NamedNodeRef;

    /// Assigns a metal centre to its metal-centre class.
    pub const IS_METAL_CENTRE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/centre/isMetalCentre");
    /// Assigns a ligand to its ligand class.
    pub const IS_LIGAND: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/ligand/isLigand");
    /// Relates a metal centre to a ligand bond.
    pub const BOND_TO_CENTRE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/structure/bLc");
    /// Relates a ligand to a ligand bond.
    pub const BOND_TO_LIGAND: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/structure/bLl");
    /// Relates a ligand bond to the atom that binds the ligand.
    pub const HAS_BINDING_ATOM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/bond/hasBindingAtom");

    /// The class of all metal centres.
    pub const METAL_CENTRE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/centre/MetalCentre");
    /// The class of all ligands.
    pub const LIGAND: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/ligand/Ligand");
    /// The class of all ligand bonds.
    pub const LIGAND_BOND: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/ligand/bond/LigandBond");
}

/// Predicates and classes of atoms.
pub mod atomic {
    use oxrdf::NamedNodeRef;

    /// Assigns an atom to its element.
    pub const IS_ATOM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/atomic/atom/isAtom");
    /// The class of all atoms.
    pub const ATOM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("resource://integreat/p5/atomic/atom/Atom");
}
