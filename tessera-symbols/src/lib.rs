//! Program symbol model consumed by the Tessera injection source generator.
//!
//! The host front end lowers the component language into this model: class
//! declarations with explicit parent links, fields with declarative markers,
//! and source locations for anchoring diagnostics. A validated
//! [ProgramSnapshot](snapshot::ProgramSnapshot) is the immutable
//! whole-program view handed to the generator once per pass.

pub mod decl;
mod error;
pub mod location;
pub mod name;
pub mod snapshot;
pub mod ty;

pub use error::SnapshotError;
