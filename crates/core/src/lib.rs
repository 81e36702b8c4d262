//! Core of the lattice toolchain: the type conversion engine and its
//! collaborators.
//!
//! The engine is a generic recursive-descent framework: a
//! [`convert::ConverterStrategy`] fixes an ordered set of
//! [`convert::TypeConverter`]s for one conversion domain, and a
//! [`convert::ConversionContext`] drives dispatch, threads run state, and
//! aggregates errors. Two domains ship here: source type declarations to IDL
//! trees ([`convert::idl`]) and IDL trees to generated mapping statements
//! ([`convert::statement`]). Everything else — batch orchestration, the schema
//! service client, project config — feeds the engine or consumes its output.

pub mod batch;
pub mod config;
pub mod convert;
pub mod declaration;
pub mod error;
pub mod sync;

pub use error::{Error, Result};
