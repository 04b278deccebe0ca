//! Core data structures consumed and produced by the pairing kernel.
//!
//! Atoms, residues, and structures mirror what the ingestion layer hands over. Frames and
//! pair records are the kernel's outputs and are consumed by downstream helix, parameter,
//! and serialization components.

pub mod atom;
pub mod frame;
pub mod pair;
pub mod residue;
pub mod structure;
pub mod types;
