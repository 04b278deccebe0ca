//! Pairing operations over framed nucleic-acid structures.
//!
//! The pipeline runs leaves first: [`LeastSquaresFitter`] superimposes standard bases,
//! [`BaseFrameCalculator`] assigns a reference frame to every recognizable nucleotide,
//! [`BasePairValidator`] and [`HydrogenBondFinder`] judge candidate pairs, and
//! [`PairFinder`] keeps the mutually best ones. All of them share [`Error`] and read
//! their thresholds from [`PairingConfig`].

mod config;
mod error;
mod fit;
mod frame;
mod hbond;
mod select;
mod validate;

pub use config::{FrameConfig, HBondConfig, Limits, PairingConfig, ValidationConfig};

pub use fit::{FitResult, LeastSquaresFitter};

pub use frame::{BaseFrameCalculator, FrameResult, RING_ATOM_NAMES, ring_atom_names};

pub use hbond::{HBondResult, HydrogenBondFinder, ISOLATED_LINKAGE};

pub use validate::{BasePairValidator, ValidationChecks, ValidationResult};

pub use select::{PairAssessment, PairFinder, hb_adjustment};

pub use error::Error;
