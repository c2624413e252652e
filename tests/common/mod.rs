//! Common test utilities

mod fixtures;

pub use fixtures::{standard_fixture, Fixture};
