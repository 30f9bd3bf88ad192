//! Clause state and statement assembly, one module per statement kind.

pub mod clause;
pub mod delete;
pub mod filter;
pub mod insert;
pub mod maintenance;
pub mod raw;
pub mod select;
pub mod state;
pub mod update;
