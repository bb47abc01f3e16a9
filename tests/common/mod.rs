//! Common test utilities for onsetplot.
//!
//! Synthetic fields, NetCDF fixtures and image checks shared by the
//! integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;
