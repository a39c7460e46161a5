//! Command-line front end for `role-classifier`: batch input, report output,
//! and the run audit log.

pub mod audit;
pub mod cli;
pub mod input;
pub mod report;
