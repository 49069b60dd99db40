pub mod authorization;
pub mod common;
pub mod endpoints;
pub mod error;
pub mod issue;
pub mod organization;
pub mod orphans;
pub mod package;
pub mod product;
pub mod project;
pub mod repository;
pub mod run;

pub use endpoints::configure;
pub use error::Error;
