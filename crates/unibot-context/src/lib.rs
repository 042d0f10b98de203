//! unibot-context
//!
//! Turns ranked documents into a bounded context block for the answer
//! generator: per-kind formatting, always-on reference sections, the rules
//! digest and the helpline directory.
pub mod assembler;
pub mod format;
pub mod helpline;
pub mod reference;
pub mod rules;

pub use assembler::{ContextAssembler, ContextBlock, NO_RELEVANT_INFORMATION};
pub use format::{DocumentFormatter, PERSONALIZATION_DIRECTIVE};
pub use helpline::HelplineDirectory;
pub use reference::{build_references, flatten_reference, ReferenceSection};
pub use rules::RulesDigest;
