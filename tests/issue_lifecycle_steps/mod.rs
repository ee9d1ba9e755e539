//! Step definitions for issue lifecycle scenarios.

pub mod then;
