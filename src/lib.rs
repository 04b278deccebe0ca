//! # PairForge
//!
//! **PairForge** is a pure-Rust base-pair kernel for nucleic-acid structures. It assigns a standard reference frame to every recognizable nucleotide, validates candidate pairs geometrically, resolves the hydrogen bonds between them, and keeps the mutually best partners, reproducing the numbers of the long-standing base-pair analysis tools.
//!
//! ## Features
//!
//! - **Reference frames** – Quaternion least-squares superposition of embedded standard bases yields an orthonormal frame per residue, with ring-geometry checks that reclassify misnamed purines.
//! - **Pair validation** – Origin distance, vertical separation, plane angle, glycosidic distance, and a scaled-integer polygon overlap decide validity; Watson-Crick and wobble pairs are typed from the in-plane step between frames.
//! - **Hydrogen bonds** – Candidate detection with deterministic conflict resolution, linkage flags, donor/acceptor typing, and quality filtering.
//! - **Mutual-best selection** – `PairFinder` scores every framed partner (in parallel with the `parallel` feature) and keeps pairs that choose each other.
//! - **Explicit configuration** – Thresholds live in `PairingConfig`, loadable from TOML; templates and residue-name registries are plain values passed by reference.
//!
//! ## Example
//!
//! ```
//! use pair_forge::db::TemplateStore;
//! use pair_forge::db::registry::BaseRegistry;
//! use pair_forge::ops::{BaseFrameCalculator, PairFinder, PairingConfig};
//! use pair_forge::Structure;
//!
//! let store = TemplateStore::embedded();
//! let registry = BaseRegistry::new_default();
//! let config = PairingConfig::default();
//!
//! let mut structure = Structure::new();
//! BaseFrameCalculator::new(&store, &registry, &config.frame).apply_to(&mut structure);
//! let pairs = PairFinder::new(&config).find_pairs(&structure).unwrap();
//! assert!(pairs.is_empty());
//! ```

mod model;
mod utils;

pub mod compat;
pub mod db;
pub mod geometry;
pub mod ops;

pub use model::atom::Atom;
pub use model::frame::{FrameSlot, ReferenceFrame};
pub use model::pair::{BasePair, BasePairType, HBondType, HydrogenBond, PairDescriptors};
pub use model::residue::{BaseIdentity, Residue};
pub use model::structure::Structure;
pub use model::types::{Element, MoleculeType, Point, RingKind};
