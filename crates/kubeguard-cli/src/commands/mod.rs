//! CLI command implementations

pub mod check;
pub mod serve;
pub mod tools;
pub mod version;
