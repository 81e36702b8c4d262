//! Shared IDL data model for the lattice toolchain.
//!
//! This crate defines the intermediate schema tree produced by conversion and
//! consumed everywhere else: by the statement generators, by the wire protocol
//! of the schema service, and by downstream code emitters. The JSON form of
//! these types *is* the wire contract, so serde attributes here are load
//! bearing.

mod decorator;
mod node;
mod structure;

pub use decorator::{Decorator, MultiTenancyType};
pub use node::{IdlKind, IdlNode};
pub use structure::{StructureRecord, structure_id};
