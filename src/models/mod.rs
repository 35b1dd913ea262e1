//! Data models

pub mod student;
pub mod verdict;

pub use student::*;
pub use verdict::*;
