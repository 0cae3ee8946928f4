//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the table row and,
//! where the row maps onto a core type, the conversion into it.

pub mod achievement;
pub mod destination;
pub mod profile;
pub mod quest;
pub mod quest_attempt;
