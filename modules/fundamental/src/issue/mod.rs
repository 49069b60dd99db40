pub mod endpoints;
pub mod service;
