// Library crate exposing modules for integration tests

pub mod error;
pub mod model;
pub mod repository;
pub mod tracker;
pub mod util;
