//! CLI command implementations.

pub mod profiles;
pub mod scan;
pub mod universes;
pub mod validate;
