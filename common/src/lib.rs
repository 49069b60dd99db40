pub mod config;
pub mod db;
pub mod error;
pub mod hashing;
pub mod model;
