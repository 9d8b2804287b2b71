//! Data models

mod branch;
mod employee;

pub use branch::*;
pub use employee::*;
