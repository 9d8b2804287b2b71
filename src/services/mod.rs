//! Business logic services

pub mod branch;
pub mod employee;

pub use branch::BranchService;
pub use employee::EmployeeService;
