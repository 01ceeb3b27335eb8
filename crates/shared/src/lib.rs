//! Domain model, store wire rows and error types shared by the campaign
//! client crates.

pub mod domain;
pub mod error;
pub mod protocol;
