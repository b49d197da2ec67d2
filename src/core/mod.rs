//! Extraction core: scan buffers for literal text, resolve or create keys,
//! and plan the source edits that replace the literals.
//!
//! ## Pipeline
//!
//! 1. [`scanner`] finds [`Candidate`]s in one buffer.
//! 2. [`resolve`] matches candidate text against loaded dictionaries.
//! 3. [`orchestrator`] creates keys for the rest, writes them through a
//!    [`Session`] and asks a [`translate::Translator`] for other languages.
//! 4. [`synthesize`] turns a candidate and its key into a [`ReplacementPlan`],
//!    consulting a [`Dialect`] probe for markup context.
//! 5. [`edit`] applies plans to the buffer.

pub mod candidate;
pub mod dialect;
pub mod dictionary;
pub mod edit;
pub mod file_scanner;
pub mod keygen;
pub mod markup;
pub mod orchestrator;
pub mod resolve;
pub mod scanner;
pub mod session;
pub mod synthesize;
pub mod translate;

pub use candidate::{Candidate, CandidateContext};
pub use dialect::{Dialect, DialectProbe};
pub use dictionary::{DictionaryTree, FlattenedIndex};
pub use orchestrator::{CandidateOutcome, CandidateState, Orchestrator, OrchestratorConfig};
pub use scanner::{Scanner, scan};
pub use session::Session;
pub use synthesize::{ReplacementPlan, synthesize};
