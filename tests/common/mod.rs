//! Common test utilities

#![allow(dead_code)]

pub mod appliance_mock;
pub mod test_fixtures;

pub use appliance_mock::{MockAppliance, TEST_ACCESS_KEY};
