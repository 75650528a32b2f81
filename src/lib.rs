//! Quantum 2048 (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so callers can write
//! `quantum2048::{core, input, term, types}`.

pub use quantum2048_core as core;
pub use quantum2048_input as input;
pub use quantum2048_term as term;
pub use quantum2048_types as types;
