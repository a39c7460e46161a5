//! CLI subcommand implementations for the role-classifier binary.

pub mod inspect_cmd;
pub mod output;
pub mod predict_cmd;
