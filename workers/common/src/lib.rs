//! Building blocks shared by the workers.

pub mod config;
pub mod env;
pub mod mapping;
pub mod result;
