//! Domain model for human-readable sequence identifiers.
//!
//! Identifiers are minted from a per-category counter and rendered as a
//! fixed prefix, a hyphen and a zero-padded decimal value
//! (`TSK-000001`, `RUN-000042`). The rendered form is a wire-visible
//! contract and is case-sensitive.

mod counter;
mod sequence;

pub use counter::{CounterType, ParseCounterTypeError};
pub use sequence::{ParseSequenceIdError, SEQUENCE_DIGITS, SequenceId};
