//! Learning sessions for finite automata that are driven by a host process across a boundary
//! which only admits flat integer and byte buffers.
//!
//! A [`Learner`] couples one instance of a [`LearningAlgorithm`] with a [`KnowledgeBase`]. The
//! host repeatedly calls [`Learner::advance`]: either the algorithm comes up with a conjecture,
//! which is handed out in its SAF encoding (see [`alf_core::saf`]), or it needs more membership
//! queries answered. Those are fetched as a [`QueryBatch`], flattened for the host and answered
//! in one go, which consumes the batch. Counterexamples to a conjecture go straight to the
//! algorithm. For passive learning, classified samples are loaded through the [`passive`]
//! module.
//!
//! The [`Family`] of an algorithm determines how answers are decoded and how conjectures are
//! encoded, with [`DfaFamily`] and [`NfaFamily`] provided. Sessions can be created by name
//! through a [`Registry`], which hands them out as type-erased [`AnyLearner`]s.
#![deny(missing_docs)]

/// The prelude is supposed to make using this package easier.
pub mod prelude {
    pub use super::{
        AlgorithmOptions, AlgorithmTable, AnyLearner, BoxedLearner, DfaFamily, DfaLearner, Family,
        KnowledgeBase, Learner, LearningAlgorithm, NfaFamily, NfaLearner, Phase, QueryBatch,
        Registry, SessionError,
    };
    pub use alf_core::prelude::*;
}

/// The capability every learning algorithm has to provide.
pub mod algorithm;
pub use algorithm::LearningAlgorithm;

/// Families of algorithms, distinguished by the kind of conjectures they produce.
pub mod family;
pub use family::{DfaFamily, Family, NfaFamily};

mod knowledge;
pub use knowledge::KnowledgeBase;

mod query;
pub use query::QueryBatch;

/// Learning sessions and their lifecycle.
pub mod learner;
pub use learner::{AnyLearner, BoxedLearner, DfaLearner, Learner, NfaLearner, Phase, SessionError};

pub mod passive;

pub mod registry;
pub use registry::{AlgorithmOptions, AlgorithmTable, Registry};

#[cfg(test)]
mod testing;
