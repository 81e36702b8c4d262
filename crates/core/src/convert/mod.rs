//! The generic type conversion engine.
//!
//! Three pieces, composed per conversion domain:
//! 1. [`TypeConverter`]: one unit per source-value category; decides
//!    applicability and performs a single level of structural conversion.
//! 2. [`ConverterStrategy`]: fixes one domain's ordered converter list, its
//!    initial run state, and a diagnostic stringifier.
//! 3. [`ConversionContext`]: the recursive-descent driver; selects converters,
//!    threads mutable state, keeps the depth stack balanced, and logs each
//!    top-level failure exactly once.
//!
//! The driver is domain-agnostic: swapping the strategy instance retargets the
//! same machinery from declaration-to-IDL conversion to statement generation.

mod context;
pub mod idl;
pub mod statement;

pub use context::{
    ConversionContext, ConverterStrategy, MAX_CONVERSION_DEPTH, TypeConverter,
};
